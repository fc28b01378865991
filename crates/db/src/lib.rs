//! `db` crate — the LightBnB data-access layer.
//!
//! Every operation builds a parameterised [`QueryPlan`], runs it through a
//! [`Store`] and returns rows or a single row. Property search assembles its
//! WHERE clause from whichever [`SearchCriteria`] are present.
//! No business logic lives here.

pub mod error;
pub mod plan;
pub mod search;
pub mod store;
pub mod pool;
pub mod models;
pub mod repository;
pub mod mock;

pub use error::DbError;
pub use plan::{InsertBuilder, PlanBuilder, QueryPlan, SqlParam};
pub use pool::DbPool;
pub use search::{build_property_search, SearchCriteria, DEFAULT_SEARCH_LIMIT};
pub use store::{PgStore, ResultRow, Store};
