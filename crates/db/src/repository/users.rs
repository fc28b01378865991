//! User lookups and registration.

use crate::{
    models::{NewUser, User},
    plan::{InsertBuilder, PlanBuilder, QueryPlan},
    store::{decode_row, Store},
    DbError,
};

pub fn user_with_email_plan(email: &str) -> QueryPlan {
    let mut plan = PlanBuilder::new("SELECT * FROM users");
    plan.filter("email =", email);
    plan.finish()
}

pub fn user_with_id_plan(id: i64) -> QueryPlan {
    let mut plan = PlanBuilder::new("SELECT * FROM users");
    plan.filter("id =", id);
    plan.finish()
}

pub fn add_user_plan(user: &NewUser) -> QueryPlan {
    InsertBuilder::new("users")
        .value("name", user.name.as_str())
        .value("email", user.email.as_str())
        .value("password", user.password.as_str())
        .build()
}

/// Fetch a single user by email. `None` if nobody registered with it.
pub async fn get_user_with_email<S: Store>(store: &S, email: &str) -> Result<Option<User>, DbError> {
    store
        .fetch_optional(&user_with_email_plan(email))
        .await?
        .map(decode_row)
        .transpose()
}

/// Fetch a single user by primary key.
pub async fn get_user_with_id<S: Store>(store: &S, id: i64) -> Result<Option<User>, DbError> {
    store
        .fetch_optional(&user_with_id_plan(id))
        .await?
        .map(decode_row)
        .transpose()
}

/// Insert a new user and return the stored row.
pub async fn add_user<S: Store>(store: &S, user: &NewUser) -> Result<User, DbError> {
    decode_row(store.fetch_one(&add_user_plan(user)).await?)
}
