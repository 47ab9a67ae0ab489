//! Property tests over generated JSON values

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use shapecheck_core::{and, not, or, Schema};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,3}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn any_accepts_every_json_value(data in arb_json()) {
        prop_assert!(shapecheck_core::any().matches(&data).unwrap());
    }

    #[test]
    fn template_from_document_matches_itself(data in arb_json()) {
        // arrays only make valid templates when they hold exactly one element
        let schema = Schema::from_json(&data);
        match schema.check(&data) {
            Ok(result) => prop_assert_eq!(result, None),
            Err(_) => prop_assert!(contains_non_singleton_array(&data)),
        }
    }

    #[test]
    fn literal_matches_only_equal_leaf(a in arb_leaf(), b in arb_leaf()) {
        let schema = Schema::from_json(&a);
        prop_assert!(schema.matches(&a).unwrap());
        let equal = match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
            _ => a == b,
        };
        prop_assert_eq!(schema.matches(&b).unwrap(), equal);
    }

    #[test]
    fn not_is_strict_complement(a in arb_leaf(), data in arb_json()) {
        let schema = Schema::from_json(&a);
        prop_assert_eq!(
            not(schema.clone()).matches(&data).unwrap(),
            !schema.matches(&data).unwrap()
        );
    }

    #[test]
    fn empty_or_rejects_and_empty_and_accepts(data in arb_json()) {
        prop_assert!(!or(Vec::<Schema>::new()).matches(&data).unwrap());
        prop_assert!(and(Vec::<Schema>::new()).matches(&data).unwrap());
        prop_assert!(or([shapecheck_core::any()]).matches(&data).unwrap());
    }
}

fn contains_non_singleton_array(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.len() != 1 || items.iter().any(contains_non_singleton_array),
        Value::Object(fields) => fields.values().any(contains_non_singleton_array),
        _ => false,
    }
}
