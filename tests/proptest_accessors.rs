//! Property-based tests using proptest
//!
//! These tests verify the attribute accessors, relationship decoding and
//! the resource index using randomized documents.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use xbe::jsonapi::{attrs, build_index, parse_collection, parse_single, ResourceIdentifier};

/// Generate an arbitrary attribute value of any JSON shape
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[ -~]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,4}", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate an attribute map with kebab-case keys
fn arb_attributes() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::hash_map("[a-z]{1,6}(-[a-z]{1,6})?", arb_value(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_identifier() -> impl Strategy<Value = ResourceIdentifier> {
    (
        prop_oneof!["users", "projects", "customers", "tags"],
        "[0-9]{1,4}",
    )
        .prop_map(|(ty, id)| ResourceIdentifier::new(ty, id))
}

proptest! {
    /// Absent keys read as zero values through every accessor
    #[test]
    fn absent_key_reads_zero_value(attributes in arb_attributes(), key in "[A-Z]{3,8}") {
        // generated keys are lowercase, so an uppercase key is never present
        prop_assert_eq!(attrs::string_attr(&attributes, &key), "");
        prop_assert!(!attrs::bool_attr(&attributes, &key));
        prop_assert_eq!(attrs::int_attr(&attributes, &key), 0);
        prop_assert_eq!(attrs::float_attr(&attributes, &key), 0.0);
        prop_assert!(attrs::string_slice_attr(&attributes, &key).is_empty());
        prop_assert!(attrs::any_attr(&attributes, &key).is_none());
    }

    /// Accessors are total and idempotent for every value shape
    #[test]
    fn accessors_are_idempotent(attributes in arb_attributes()) {
        for key in attributes.keys() {
            prop_assert_eq!(
                attrs::string_attr(&attributes, key),
                attrs::string_attr(&attributes, key)
            );
            prop_assert_eq!(
                attrs::int_attr(&attributes, key),
                attrs::int_attr(&attributes, key)
            );
            prop_assert_eq!(
                attrs::bool_attr(&attributes, key),
                attrs::bool_attr(&attributes, key)
            );
            prop_assert_eq!(
                attrs::display_value(&attributes[key]),
                attrs::display_value(&attributes[key])
            );
        }
    }

    /// Wrong-typed values read the same as absent ones
    #[test]
    fn string_attr_only_reads_strings(value in arb_value()) {
        let mut attributes = Map::new();
        attributes.insert("field".to_string(), value.clone());
        let expected = value.as_str().unwrap_or_default().to_string();
        prop_assert_eq!(attrs::string_attr(&attributes, "field"), expected);
    }

    /// Integer strings parse to the same integer
    #[test]
    fn int_attr_parses_numeric_strings(n in any::<i64>()) {
        let mut attributes = Map::new();
        attributes.insert("count".to_string(), Value::String(n.to_string()));
        prop_assert_eq!(attrs::int_attr(&attributes, "count"), n);
    }

    /// To-many linkage survives parsing with length and order intact
    #[test]
    fn to_many_round_trip(targets in prop::collection::vec(arb_identifier(), 0..20)) {
        let data: Vec<Value> = targets.iter().map(ResourceIdentifier::to_value).collect();
        let body = json!({
            "data": {
                "id": "1",
                "type": "widgets",
                "relationships": {"members": {"data": data}}
            }
        })
        .to_string();

        let doc = parse_single(body.as_bytes()).unwrap();
        let widget = doc.data.as_ref().unwrap();
        prop_assert_eq!(widget.relationship_to_many("members"), targets.as_slice());
        prop_assert_eq!(widget.relationship_count("members"), targets.len());
    }

    /// The later of two duplicate included resources wins
    #[test]
    fn duplicate_included_last_write_wins(
        target in arb_identifier(),
        first in "[a-z]{1,10}",
        second in "[a-z]{1,10}",
    ) {
        let body = json!({
            "data": [],
            "included": [
                {"id": target.id, "type": target.ty, "attributes": {"name": first}},
                {"id": target.id, "type": target.ty, "attributes": {"name": second}}
            ]
        })
        .to_string();

        let doc = parse_collection(body.as_bytes()).unwrap();
        let index = build_index(&doc.included);
        let attributes = index.resolve(&target).unwrap();
        prop_assert_eq!(attrs::string_attr(attributes, "name"), second);
    }

    /// Every sideloaded reference resolves and every other one does not
    #[test]
    fn resolve_matches_included(
        sideloaded in prop::collection::vec(arb_identifier(), 0..10),
        probe in arb_identifier(),
    ) {
        let included: Vec<Value> = sideloaded
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "type": r.ty,
                    "attributes": {"name": format!("{}-{}", r.ty, r.id)}
                })
            })
            .collect();
        let body = json!({"data": null, "included": included}).to_string();

        let doc = parse_single(body.as_bytes()).unwrap();
        let index = build_index(&doc.included);

        for reference in &sideloaded {
            let attributes = index.resolve(reference).unwrap();
            prop_assert_eq!(
                attrs::string_attr(attributes, "name"),
                format!("{}-{}", reference.ty, reference.id)
            );
        }
        prop_assert_eq!(index.resolve(&probe).is_some(), sideloaded.contains(&probe));
    }
}
