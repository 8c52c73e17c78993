use docmap::{Array, CoercingError, Kind, Number, Object, Value};

fn array_of(items: &[i64]) -> Value {
    Value::Array(items.iter().copied().map(Value::from).collect())
}

// ============================================================================
// Kinds
// ============================================================================

#[test]
fn kind_predicates_match_variant() {
    assert!(Value::Null.is_null());
    assert!(Value::from(true).is_boolean());
    assert!(Value::from(1).is_number());
    assert!(Value::from("x").is_string());
    assert!(Value::Array(Array::new()).is_array());
    assert!(Value::Object(Object::new()).is_object());
    assert!(!Value::from("x").is_number());
}

#[test]
fn kind_names_are_lowercase() {
    assert_eq!(Value::Null.kind().to_string(), "null");
    assert_eq!(Value::from(2.5).kind(), Kind::Number);
    assert_eq!(Kind::Object.as_str(), "object");
}

#[test]
fn none_converts_to_null() {
    let absent: Option<i32> = None;
    assert!(Value::from(absent).is_null());
    assert_eq!(Value::from(Some(3)), Value::from(3));
}

#[test]
fn non_finite_float_converts_to_null() {
    assert!(Value::from(f64::NAN).is_null());
    assert!(Value::from(f64::INFINITY).is_null());
}

// ============================================================================
// Lenient coercion
// ============================================================================

#[test]
fn boolean_to_string() {
    assert_eq!(Value::from(true).as_string(false).unwrap(), "true");
    assert_eq!(Value::from(false).as_string(false).unwrap(), "false");
}

#[test]
fn number_to_string() {
    assert_eq!(Value::from(42).as_string(false).unwrap(), "42");
    assert_eq!(Value::from(-7).as_string(false).unwrap(), "-7");
    assert_eq!(Value::from(2.5).as_string(false).unwrap(), "2.5");
}

#[test]
fn boolean_to_number() {
    assert_eq!(Value::from(true).as_number(false).unwrap(), Number::from(1));
    assert_eq!(Value::from(false).as_number(false).unwrap(), Number::from(0));
}

#[test]
fn string_to_number() {
    assert_eq!(Value::from("1").as_number(false).unwrap(), Number::from(1));
    assert_eq!(Value::from("-12").as_number(false).unwrap().as_i64(), Some(-12));
    assert_eq!(Value::from("2.25").as_number(false).unwrap().as_f64(), 2.25);
}

#[test]
fn unparseable_string_to_number_names_the_value() {
    let err = Value::from("abc").as_number(false).unwrap_err();
    assert_eq!(
        err,
        CoercingError::Value {
            requested: Kind::Number,
            value: "\"abc\"".to_string()
        }
    );
}

#[test]
fn string_to_boolean_table() {
    for text in ["1", "true", "yes", "y"] {
        assert!(Value::from(text).as_boolean(false).unwrap(), "{text}");
    }
    for text in ["0", "false", "no", "n"] {
        assert!(!Value::from(text).as_boolean(false).unwrap(), "{text}");
    }
    assert!(Value::from("maybe").as_boolean(false).is_err());
}

#[test]
fn number_to_boolean_only_zero_and_one() {
    assert!(!Value::from(0).as_boolean(false).unwrap());
    assert!(Value::from(1).as_boolean(false).unwrap());
    assert!(Value::from(1.0).as_boolean(false).unwrap());
    let err = Value::from(2).as_boolean(false).unwrap_err();
    assert_eq!(err.requested(), Kind::Boolean);
}

#[test]
fn containers_and_null_do_not_coerce() {
    assert!(Value::Null.as_string(false).is_err());
    assert!(array_of(&[1]).as_string(false).is_err());
    assert!(Value::from("x").as_array(false).is_err());
    assert!(Value::from(1).as_object(false).is_err());
    assert_eq!(
        Value::Null.as_number(false).unwrap_err(),
        CoercingError::Kind {
            requested: Kind::Number,
            found: Kind::Null
        }
    );
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn strict_rejects_cross_kind_access() {
    assert!(Value::from("1").as_number(true).is_err());
    assert!(Value::from(true).as_string(true).is_err());
    assert!(Value::from(1).as_boolean(true).is_err());
}

#[test]
fn strict_accepts_exact_kind() {
    assert_eq!(Value::from("x").as_string(true).unwrap(), "x");
    assert_eq!(Value::from(5).as_number(true).unwrap(), Number::from(5));
    assert!(Value::from(true).as_boolean(true).unwrap());
}

#[test]
fn strict_error_message_mentions_both_kinds() {
    let message = Value::from("1").as_number(true).unwrap_err().to_string();
    assert!(message.contains("'string'"), "{message}");
    assert!(message.contains("'number'"), "{message}");
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn lenient_equality_across_primitive_kinds() {
    assert!(Value::from("1").equals(&Value::from(1), false));
    assert!(Value::from(1).equals(&Value::from("1"), false));
    assert!(Value::from(true).equals(&Value::from("yes"), false));
    assert!(Value::from(true).equals(&Value::from(1), false));
    assert!(!Value::from("2").equals(&Value::from(1), false));
}

#[test]
fn strict_equality_requires_same_kind() {
    assert!(!Value::from("1").equals(&Value::from(1), true));
    assert!(Value::from(1).equals(&Value::from(1.0), true));
    assert_ne!(Value::from("1"), Value::from(1));
}

#[test]
fn arrays_of_different_length_never_equal() {
    let short = array_of(&[1, 2]);
    let long = array_of(&[1, 2, 3]);
    assert!(!short.equals(&long, false));
    assert!(!short.equals(&long, true));
    assert!(!long.equals(&short, false));
}

#[test]
fn array_equality_is_pairwise_and_ordered() {
    assert_eq!(array_of(&[1, 2]), array_of(&[1, 2]));
    assert_ne!(array_of(&[1, 2]), array_of(&[2, 1]));
}

#[test]
fn object_equality_ignores_key_order() {
    let a: Object = [("x", 1), ("y", 2)].into_iter().collect();
    let b: Object = [("y", 2), ("x", 1)].into_iter().collect();
    assert_eq!(Value::Object(a), Value::Object(b));
}

#[test]
fn object_equality_requires_exact_key_set() {
    let a: Object = [("x", 1)].into_iter().collect();
    let b: Object = [("x", 1), ("y", 2)].into_iter().collect();
    assert!(!Value::Object(a.clone()).equals(&Value::Object(b.clone()), false));
    assert!(!Value::Object(b).equals(&Value::Object(a), false));
}

#[test]
fn lenient_equality_reaches_nested_values() {
    let mut a = Object::new();
    a.set("n", "5");
    let mut b = Object::new();
    b.set("n", 5);
    assert!(Value::Object(a.clone()).equals(&Value::Object(b.clone()), false));
    assert!(!Value::Object(a).equals(&Value::Object(b), true));
}

// ============================================================================
// Builders and cloning
// ============================================================================

#[test]
fn object_set_keeps_insertion_order_and_last_write_wins() {
    let mut object = Object::new();
    object.set("b", 1).set("a", 2).set("b", 3);
    let keys: Vec<&String> = object.keys().collect();
    assert_eq!(keys, ["b", "a"]);
    assert_eq!(object.get("b"), Some(&Value::from(3)));
}

#[test]
fn object_remove_and_clear() {
    let mut object: Object = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    assert_eq!(object.remove("b"), Some(Value::from(2)));
    assert_eq!(object.keys().cloned().collect::<Vec<_>>(), ["a", "c"]);
    assert_eq!(object.remove("missing"), None);
    object.clear();
    assert!(object.is_empty());
}

#[test]
fn array_add_set_remove_clear() {
    let mut array = Array::new();
    array.add(1).add("two").add(Value::Null);
    assert_eq!(array.len(), 3);
    assert_eq!(array.set(1, 2), Some(Value::from("two")));
    assert_eq!(array.set(9, 2), None);
    assert_eq!(array.remove(0), Some(Value::from(1)));
    assert_eq!(array.remove(5), None);
    assert_eq!(array.get(0), Some(&Value::from(2)));
    array.clear();
    assert!(array.is_empty());
}

#[test]
fn clone_is_a_deep_copy() {
    let mut inner = Object::new();
    inner.set("n", 1);
    let mut outer = Object::new();
    outer.set("inner", inner);
    let original = Value::Object(outer);

    let mut copy = original.clone();
    copy.as_object_mut()
        .unwrap()
        .get_mut("inner")
        .unwrap()
        .as_object_mut()
        .unwrap()
        .set("n", 2);

    assert_eq!(original.query("inner.n"), Some(&Value::from(1)));
    assert_eq!(copy.query("inner.n"), Some(&Value::from(2)));
}

#[test]
fn vec_converts_to_array() {
    let value = Value::from(vec!["a", "b"]);
    assert_eq!(value.as_array(true).unwrap().len(), 2);
}

#[test]
fn display_renders_compact_json() {
    let mut object = Object::new();
    object.set("a", 1).set("b", vec![true, false]).set_null("c");
    assert_eq!(Value::Object(object).to_string(), r#"{"a":1,"b":[true,false],"c":null}"#);
}
