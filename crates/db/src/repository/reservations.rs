//! Reservation listings.

use crate::{
    plan::{PlanBuilder, QueryPlan},
    store::{ResultRow, Store},
    DbError,
};

/// Number of reservations returned when the caller does not pick a limit.
pub const DEFAULT_RESERVATION_LIMIT: i64 = 10;

/// Reservation columns are aliased so they don't collide with the joined
/// property's `id`.
const RESERVATIONS_QUERY: &str = "SELECT properties.*, \
     reservations.id AS reservation_id, reservations.start_date, reservations.end_date \
     FROM reservations \
     JOIN properties ON properties.id = reservations.property_id";

pub fn upcoming_reservations_plan(guest_id: i64, limit: i64) -> QueryPlan {
    let mut plan = PlanBuilder::new(RESERVATIONS_QUERY);
    plan.filter("reservations.guest_id =", guest_id);
    plan.push_sql("AND reservations.start_date > now()::date ORDER BY reservations.start_date");
    let limit = plan.bind(limit);
    plan.push_sql(&format!("LIMIT {limit}"));
    plan.finish()
}

/// Upcoming reservations for one guest, each joined with its property,
/// soonest first.
pub async fn get_all_reservations<S: Store>(
    store: &S,
    guest_id: i64,
    limit: i64,
) -> Result<Vec<ResultRow>, DbError> {
    store.execute(&upcoming_reservations_plan(guest_id, limit)).await
}
