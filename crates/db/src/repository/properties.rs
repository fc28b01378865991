//! Property search and creation.

use tracing::debug;

use crate::{
    models::NewProperty,
    plan::{InsertBuilder, QueryPlan},
    search::{build_property_search, SearchCriteria},
    store::{ResultRow, Store},
    DbError,
};

/// Properties matching `criteria`, cheapest first, at most `limit` rows.
///
/// Each row carries every `properties` column plus `average_rating`.
pub async fn get_all_properties<S: Store>(
    store: &S,
    criteria: &SearchCriteria,
    limit: i64,
) -> Result<Vec<ResultRow>, DbError> {
    let plan = build_property_search(criteria, limit);
    let rows = store.execute(&plan).await?;
    debug!(rows = rows.len(), "property search finished");
    Ok(rows)
}

/// Only the optional columns that are set are inserted.
pub fn add_property_plan(property: &NewProperty) -> QueryPlan {
    InsertBuilder::new("properties")
        .value("owner_id", property.owner_id)
        .value("title", property.title.as_str())
        .value_opt("description", property.description.as_deref())
        .value_opt("thumbnail_photo_url", property.thumbnail_photo_url.as_deref())
        .value_opt("cover_photo_url", property.cover_photo_url.as_deref())
        .value("cost_per_night", property.cost_per_night)
        .value_opt("parking_spaces", property.parking_spaces)
        .value_opt("number_of_bathrooms", property.number_of_bathrooms)
        .value_opt("number_of_bedrooms", property.number_of_bedrooms)
        .value_opt("country", property.country.as_deref())
        .value_opt("street", property.street.as_deref())
        .value_opt("city", property.city.as_deref())
        .value_opt("province", property.province.as_deref())
        .value_opt("post_code", property.post_code.as_deref())
        .value_opt("active", property.active)
        .build()
}

/// Insert a property and return the stored row.
pub async fn add_property<S: Store>(store: &S, property: &NewProperty) -> Result<ResultRow, DbError> {
    store.fetch_one(&add_property_plan(property)).await
}
