use db::{build_property_search, SearchCriteria, SqlParam};
use proptest::prelude::*;

fn arb_criteria() -> impl Strategy<Value = SearchCriteria> {
    (
        prop::option::of("[A-Za-z ]{1,12}"),
        prop::option::of(1i64..10_000),
        prop::option::of(0.0f64..1_000.0),
        prop::option::of(0.0f64..5_000.0),
        prop::option::of(0.0f64..5.0),
    )
        .prop_map(|(city, owner_id, min, max, rating)| SearchCriteria {
            // Leading letter keeps the pattern non-blank.
            city: city.map(|c| format!("x{c}")),
            owner_id,
            minimum_price_per_night: min,
            maximum_price_per_night: max,
            minimum_rating: rating,
        })
}

fn row_filter_count(c: &SearchCriteria) -> usize {
    [
        c.city.is_some(),
        c.owner_id.is_some(),
        c.minimum_price_per_night.is_some(),
        c.maximum_price_per_night.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count()
}

proptest! {
    /// Property: placeholders read $1..$N in text order, N = parameter count
    #[test]
    fn prop_placeholders_are_contiguous(criteria in arb_criteria(), limit in 1i64..100) {
        let plan = build_property_search(&criteria, limit);
        let expected: Vec<usize> = (1..=plan.params().len()).collect();
        prop_assert_eq!(plan.placeholder_indices(), expected);
    }

    /// Property: k row filters → k + 1 parameters, one WHERE then only ANDs
    #[test]
    fn prop_row_filters_open_with_where_then_and(criteria in arb_criteria(), limit in 1i64..100) {
        let criteria = SearchCriteria { minimum_rating: None, ..criteria };
        let k = row_filter_count(&criteria);
        let plan = build_property_search(&criteria, limit);

        prop_assert_eq!(plan.params().len(), k + 1);
        prop_assert_eq!(plan.sql().matches(" WHERE ").count(), usize::from(k > 0));
        prop_assert_eq!(plan.sql().matches(" AND ").count(), k.saturating_sub(1));
    }

    /// Property: the limit is always last, the rating (if any) just before it
    #[test]
    fn prop_rating_then_limit_close_the_parameter_list(criteria in arb_criteria(), limit in 1i64..100) {
        let plan = build_property_search(&criteria, limit);
        let params = plan.params();

        prop_assert_eq!(params.last(), Some(&SqlParam::Int(limit)));
        if let Some(rating) = criteria.minimum_rating {
            prop_assert_eq!(&params[params.len() - 2], &SqlParam::Float(rating));
            prop_assert!(plan.sql().contains("AS result WHERE average_rating >= $"));
        } else {
            prop_assert!(!plan.sql().contains("average_rating >="));
        }
    }

    /// Property: prices are bound in cents
    #[test]
    fn prop_prices_are_scaled_to_cents(dollars in 0u32..100_000) {
        let criteria = SearchCriteria {
            minimum_price_per_night: Some(f64::from(dollars)),
            ..Default::default()
        };
        let plan = build_property_search(&criteria, 2);
        prop_assert_eq!(&plan.params()[0], &SqlParam::Int(i64::from(dollars) * 100));
    }
}
