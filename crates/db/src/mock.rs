//! `RecordingStore` — a test double for [`Store`].
//!
//! Records every plan it is asked to execute and answers with rows (or a
//! failure) chosen at construction time, so repository functions can be
//! exercised without a Postgres instance.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    plan::QueryPlan,
    store::{ResultRow, Store},
    DbError,
};

/// What the store does when `execute` is called.
pub enum MockBehaviour {
    /// Return these rows for every call.
    ReturnRows(Vec<ResultRow>),
    /// Fail every call with a store error carrying this message.
    Fail(String),
}

pub struct RecordingStore {
    pub behaviour: MockBehaviour,
    /// Every plan seen by this store, in call order.
    pub calls: Arc<Mutex<Vec<QueryPlan>>>,
}

impl RecordingStore {
    /// A store that returns no rows.
    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    pub fn returning(rows: Vec<ResultRow>) -> Self {
        Self {
            behaviour: MockBehaviour::ReturnRows(rows),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A store that returns one row per JSON object in `rows`; other values
    /// are skipped.
    pub fn returning_json(rows: Vec<Value>) -> Self {
        Self::returning(
            rows.into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recently executed plan.
    pub fn last_plan(&self) -> Option<QueryPlan> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<ResultRow>, DbError> {
        self.calls.lock().unwrap().push(plan.clone());

        match &self.behaviour {
            MockBehaviour::ReturnRows(rows) => Ok(rows.clone()),
            MockBehaviour::Fail(msg) => Err(DbError::Sqlx(sqlx::Error::Protocol(msg.clone()))),
        }
    }
}
