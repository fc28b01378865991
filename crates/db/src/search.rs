//! Property search — turns optional filter criteria into a [`QueryPlan`].
//!
//! The plan returns one row per property with its average review rating,
//! filtered by every criterion present and cheapest first:
//!
//! ```text
//! SELECT properties.*, avg(property_reviews.rating) AS average_rating
//! FROM properties JOIN property_reviews ON …
//! [WHERE city LIKE $a] [AND owner_id = $b] [AND cost_per_night >= $c] [AND cost_per_night <= $d]
//! GROUP BY properties.id ORDER BY cost_per_night
//! LIMIT $n
//! ```
//!
//! A minimum rating can only be checked after grouping, so when one is given
//! the grouped query becomes a subquery with an outer
//! `WHERE average_rating >= $k`, and the limit moves to the outer query.

use serde::{Deserialize, Serialize};

use crate::plan::{PlanBuilder, QueryPlan};

/// Number of properties returned when the caller does not pick a limit.
pub const DEFAULT_SEARCH_LIMIT: i64 = 2;

const BASE_QUERY: &str = "SELECT properties.*, avg(property_reviews.rating) AS average_rating \
     FROM properties \
     JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Optional property-search filters. `None` means "do not filter on this".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchCriteria {
    /// `LIKE` pattern matched against `properties.city`.
    pub city: Option<String>,
    pub owner_id: Option<i64>,
    /// Major currency units (dollars); stored prices are in cents.
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

impl SearchCriteria {
    /// Match cities containing `fragment` anywhere. `%`, `_` and `\` in the
    /// fragment are matched literally.
    pub fn with_city_containing(mut self, fragment: &str) -> Self {
        let mut pattern = String::with_capacity(fragment.len() + 2);
        pattern.push('%');
        for c in fragment.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        self.city = Some(pattern);
        self
    }

    /// `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.city().is_none()
            && self.owner_id.is_none()
            && self.minimum_price_per_night.is_none()
            && self.maximum_price_per_night.is_none()
            && self.minimum_rating.is_none()
    }

    /// Blank city patterns count as absent.
    fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Dollars to cents, rounded to the nearest cent.
fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Build the property search plan for `criteria`, capped at `limit` rows.
///
/// Parameters are ordered city, owner, minimum price, maximum price,
/// minimum rating, limit — skipping absent criteria.
pub fn build_property_search(criteria: &SearchCriteria, limit: i64) -> QueryPlan {
    let mut plan = PlanBuilder::new(BASE_QUERY);

    if let Some(city) = criteria.city() {
        plan.filter("city LIKE", city);
    }
    if let Some(owner_id) = criteria.owner_id {
        plan.filter("owner_id =", owner_id);
    }
    if let Some(min) = criteria.minimum_price_per_night {
        plan.filter("cost_per_night >=", to_minor_units(min));
    }
    if let Some(max) = criteria.maximum_price_per_night {
        plan.filter("cost_per_night <=", to_minor_units(max));
    }

    plan.push_sql("GROUP BY properties.id ORDER BY cost_per_night");

    if let Some(rating) = criteria.minimum_rating {
        plan.wrap_as_subquery("result");
        plan.filter("average_rating >=", rating);
        plan.push_sql("ORDER BY cost_per_night");
    }

    let limit = plan.bind(limit);
    plan.push_sql(&format!("LIMIT {limit}"));
    plan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SqlParam;

    #[test]
    fn no_criteria_yields_only_the_limit() {
        let plan = build_property_search(&SearchCriteria::default(), 5);
        assert_eq!(plan.params(), &[SqlParam::Int(5)]);
        assert!(!plan.sql().contains("WHERE"));
        assert!(plan.sql().ends_with("GROUP BY properties.id ORDER BY cost_per_night LIMIT $1"));
    }

    #[test]
    fn city_and_minimum_price() {
        let criteria = SearchCriteria {
            city: Some("Toronto".into()),
            minimum_price_per_night: Some(50.0),
            ..Default::default()
        };
        let plan = build_property_search(&criteria, 10);
        assert_eq!(
            plan.params(),
            &[SqlParam::from("Toronto"), SqlParam::Int(5000), SqlParam::Int(10)]
        );
        assert!(plan.sql().contains("WHERE city LIKE $1 AND cost_per_night >= $2"));
        assert!(plan.sql().ends_with("LIMIT $3"));
    }

    #[test]
    fn all_four_row_filters_in_fixed_order() {
        let criteria = SearchCriteria {
            city: Some("%Van%".into()),
            owner_id: Some(7),
            minimum_price_per_night: Some(100.0),
            maximum_price_per_night: Some(250.0),
            minimum_rating: None,
        };
        let plan = build_property_search(&criteria, 2);
        assert!(plan.sql().contains(
            "WHERE city LIKE $1 AND owner_id = $2 AND cost_per_night >= $3 AND cost_per_night <= $4 GROUP BY"
        ));
        assert_eq!(
            plan.params(),
            &[
                SqlParam::from("%Van%"),
                SqlParam::Int(7),
                SqlParam::Int(10_000),
                SqlParam::Int(25_000),
                SqlParam::Int(2),
            ]
        );
    }

    #[test]
    fn owner_alone_still_opens_with_where() {
        let criteria = SearchCriteria {
            owner_id: Some(3),
            ..Default::default()
        };
        let plan = build_property_search(&criteria, 2);
        assert!(plan.sql().contains("WHERE owner_id = $1 GROUP BY"));
        assert!(!plan.sql().contains("AND"));
    }

    #[test]
    fn minimum_rating_wraps_the_grouped_query() {
        let criteria = SearchCriteria {
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let plan = build_property_search(&criteria, 3);
        assert_eq!(plan.params(), &[SqlParam::Float(4.0), SqlParam::Int(3)]);
        assert!(plan.sql().starts_with("SELECT * FROM (SELECT properties.*"));
        assert!(plan
            .sql()
            .ends_with(") AS result WHERE average_rating >= $1 ORDER BY cost_per_night LIMIT $2"));
        assert!(plan.is_well_numbered());
    }

    #[test]
    fn rating_is_bound_after_price_filters_and_before_limit() {
        let criteria = SearchCriteria {
            maximum_price_per_night: Some(99.99),
            minimum_rating: Some(3.5),
            ..Default::default()
        };
        let plan = build_property_search(&criteria, 4);
        assert_eq!(
            plan.params(),
            &[SqlParam::Int(9999), SqlParam::Float(3.5), SqlParam::Int(4)]
        );
        assert!(plan.sql().contains("WHERE cost_per_night <= $1 GROUP BY"));
        assert!(plan.sql().contains("WHERE average_rating >= $2"));
        assert!(plan.sql().ends_with("LIMIT $3"));
    }

    #[test]
    fn blank_city_is_ignored() {
        let criteria = SearchCriteria {
            city: Some("   ".into()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
        let plan = build_property_search(&criteria, 2);
        assert_eq!(plan.params().len(), 1);
    }

    #[test]
    fn city_containing_escapes_like_metacharacters() {
        let criteria = SearchCriteria::default().with_city_containing("50%_off");
        assert_eq!(criteria.city.as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn fractional_prices_round_to_cents() {
        assert_eq!(to_minor_units(50.5), 5050);
        assert_eq!(to_minor_units(99.99), 9999);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
    }

    #[test]
    fn criteria_deserialize_from_sparse_json() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"city":"Banff","minimum_rating":4}"#).unwrap();
        assert_eq!(criteria.city.as_deref(), Some("Banff"));
        assert_eq!(criteria.minimum_rating, Some(4.0));
        assert!(criteria.owner_id.is_none());

        assert!(serde_json::from_str::<SearchCriteria>(r#"{"colour":"red"}"#).is_err());
    }
}
