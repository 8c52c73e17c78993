/// Property-based tests for the value tree and the mapper.
///
/// Checks that:
/// - composites survive `from_tree(to_tree(x)) == x` under every naming policy
/// - trees survive a trip through `serde_json::Value`
/// - every value equals its own clone in both strict and lenient mode
/// - integers survive lenient string coercion and back
/// - dotted paths survive parse/display
use std::collections::BTreeMap;

use docmap::{Array, Composite, FieldSet, Mappable, Mapper, NamingPolicy, Object, Path, Shape, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_policy() -> impl Strategy<Value = NamingPolicy> {
    prop_oneof![
        Just(NamingPolicy::None),
        Just(NamingPolicy::CamelCase),
        Just(NamingPolicy::PascalCase),
        Just(NamingPolicy::SnakeCase),
        Just(NamingPolicy::KebabCase),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12).prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| Value::Array(items.into_iter().collect::<Array>())),
            prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]{0,8}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Object>())),
        ]
    })
}

// ============================================================================
// Fixture
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
struct Record {
    display_name: String,
    item_count: i64,
    unit_ratio: f64,
    feature_flags: Vec<bool>,
    side_note: Option<String>,
    named_scores: BTreeMap<String, i32>,
}

impl Mappable for Record {
    fn shape() -> Shape {
        Shape::composite::<Self>()
    }
}

impl Composite for Record {
    fn describe(fields: &mut FieldSet<Self>) {
        fields.field("display_name", |r| &r.display_name, |r| &mut r.display_name);
        fields.field("item_count", |r| &r.item_count, |r| &mut r.item_count);
        fields.field("unit_ratio", |r| &r.unit_ratio, |r| &mut r.unit_ratio);
        fields.field("feature_flags", |r| &r.feature_flags, |r| &mut r.feature_flags);
        fields.field("side_note", |r| &r.side_note, |r| &mut r.side_note);
        fields.field("named_scores", |r| &r.named_scores, |r| &mut r.named_scores);
    }
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        "\\PC{0,20}",
        any::<i64>(),
        -1.0e9f64..1.0e9,
        prop::collection::vec(any::<bool>(), 0..5),
        prop::option::of("\\PC{0,10}"),
        prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..4),
    )
        .prop_map(
            |(display_name, item_count, unit_ratio, feature_flags, side_note, named_scores)| Record {
                display_name,
                item_count,
                unit_ratio,
                feature_flags,
                side_note,
                named_scores,
            },
        )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn composite_roundtrip(record in arb_record(), policy in arb_policy(), strict in any::<bool>()) {
        let mut mapper = Mapper::new();
        mapper.naming_policy(policy).strict(strict);
        let tree = mapper.to_tree(&record).unwrap();
        let back: Record = mapper.from_tree(&tree).unwrap().unwrap();
        prop_assert_eq!(back, record);
    }

    #[test]
    fn serde_json_roundtrip(value in arb_value()) {
        let json: serde_json::Value = value.clone().into();
        prop_assert_eq!(Value::from(json), value);
    }

    #[test]
    fn value_equals_its_clone(value in arb_value()) {
        let copy = value.clone();
        prop_assert!(value.equals(&copy, true));
        prop_assert!(value.equals(&copy, false));
    }

    #[test]
    fn integers_survive_lenient_string_coercion(n in any::<i64>()) {
        let text = Value::from(n).as_string(false).unwrap().into_owned();
        let back = Value::from(text).as_number(false).unwrap();
        prop_assert_eq!(back.as_i64(), Some(n));
    }

    #[test]
    fn path_display_parse_roundtrip(parts in prop::collection::vec("[a-z0-9_]{1,8}", 1..6)) {
        let dotted = parts.join(".");
        let path = Path::parse(&dotted).unwrap();
        prop_assert_eq!(path.parts().len(), parts.len());
        prop_assert_eq!(path.to_string(), dotted);
    }
}
