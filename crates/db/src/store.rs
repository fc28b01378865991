//! The execution channel: something that runs a [`QueryPlan`] and hands
//! back rows.
//!
//! Repository functions are generic over [`Store`], so they run unchanged
//! against Postgres ([`PgStore`]) or the in-memory [`RecordingStore`]
//! used in tests.
//!
//! [`RecordingStore`]: crate::mock::RecordingStore

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres};
use tracing::{debug, warn};

use crate::{
    plan::{QueryPlan, SqlParam},
    DbError,
};

/// One returned row: column name → value, exactly as the store produced it.
pub type ResultRow = Map<String, Value>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Run `plan` and return every row it produces (possibly none).
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<ResultRow>, DbError>;

    /// First row, or `None` when the statement returned nothing.
    async fn fetch_optional(&self, plan: &QueryPlan) -> Result<Option<ResultRow>, DbError> {
        Ok(self.execute(plan).await?.into_iter().next())
    }

    /// First row, or [`DbError::NotFound`].
    async fn fetch_one(&self, plan: &QueryPlan) -> Result<ResultRow, DbError> {
        self.fetch_optional(plan).await?.ok_or(DbError::NotFound)
    }
}

/// Map a row onto a typed model.
pub fn decode_row<T: DeserializeOwned>(row: ResultRow) -> Result<T, DbError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`Store`] backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Wrap any row-returning statement (SELECT or `… RETURNING`) so each row
/// comes back as a single JSON object column.
fn as_json_rows(sql: &str) -> String {
    format!("WITH result_row AS ({sql}) SELECT row_to_json(result_row) AS row FROM result_row")
}

#[async_trait]
impl Store for PgStore {
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<ResultRow>, DbError> {
        debug!(sql = plan.sql(), params = plan.params().len(), "executing query plan");

        let sql = as_json_rows(plan.sql());
        let mut query = sqlx::query_scalar::<Postgres, Value>(&sql);
        for param in plan.params() {
            query = match param {
                SqlParam::Text(v) => query.bind(v.as_str()),
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Float(v) => query.bind(*v),
                SqlParam::Bool(v) => query.bind(*v),
            };
        }

        let values = query.fetch_all(&self.pool).await.map_err(|e| {
            warn!(error = %e, sql = plan.sql(), "query plan failed");
            DbError::from(e)
        })?;

        values
            .into_iter()
            .map(|value| match value {
                Value::Object(row) => Ok(row),
                other => Err(DbError::UnexpectedRow(other)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_wrapping_keeps_the_statement_intact() {
        let sql = "INSERT INTO users (name) VALUES ($1) RETURNING *";
        assert_eq!(
            as_json_rows(sql),
            "WITH result_row AS (INSERT INTO users (name) VALUES ($1) RETURNING *) \
             SELECT row_to_json(result_row) AS row FROM result_row"
        );
    }

    #[test]
    fn decode_row_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }

        let mut row = ResultRow::new();
        row.insert("name".into(), Value::from(42));
        assert!(matches!(decode_row::<Named>(row), Err(DbError::Decode(_))));
    }
}
