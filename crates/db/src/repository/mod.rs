//! Repository functions — one function per database operation.
//!
//! Every operation has a `*_plan` function that only builds the statement
//! and an async function that runs it against any [`Store`] and returns
//! `Result<T, DbError>`. No business logic — pure SQL.
//!
//! [`Store`]: crate::store::Store

pub mod users;
pub mod reservations;
pub mod properties;
