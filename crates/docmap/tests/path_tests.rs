use docmap::{Path, Value};
use serde_json::json;

fn document() -> Value {
    Value::from(json!({
        "customer": { "name": "Ada", "tags": ["vip", "early"] },
        "orders": [ { "id": 7, "note": null } ]
    }))
}

#[test]
fn parse_and_display() {
    let path = Path::parse("orders.0.id").unwrap();
    assert_eq!(path.parts(), ["orders", "0", "id"]);
    assert_eq!(path.to_string(), "orders.0.id");
    assert_eq!(path.name(), Some("id"));
}

#[test]
fn empty_string_is_root() {
    let root = Path::parse("").unwrap();
    assert!(root.is_root());
    assert_eq!(root.parent(), None);
    assert_eq!(document().query(""), Some(&document()));
}

#[test]
fn empty_segment_is_rejected() {
    assert!(Path::parse("a..b").is_err());
    assert!(Path::parse(".a").is_err());
    assert!("a.".parse::<Path>().is_err());
}

#[test]
fn sub_path_parent_concat() {
    let base = Path::parse("a.b").unwrap();
    assert_eq!(base.sub_path("c").to_string(), "a.b.c");
    assert_eq!(base.parent().unwrap().to_string(), "a");
    let tail = Path::parse("x.y").unwrap();
    assert_eq!(base.concat(&tail).to_string(), "a.b.x.y");
}

#[test]
fn query_walks_objects_and_arrays() {
    let doc = document();
    assert_eq!(doc.query("customer.name"), Some(&Value::from("Ada")));
    assert_eq!(doc.query("customer.tags.1"), Some(&Value::from("early")));
    assert_eq!(doc.query("orders.0.id"), Some(&Value::from(7)));
}

#[test]
fn query_missing_returns_none() {
    let doc = document();
    assert_eq!(doc.query("customer.email"), None);
    assert_eq!(doc.query("orders.3.id"), None);
    assert_eq!(doc.query("customer.name.first"), None);
    assert_eq!(doc.query("orders..id"), None);
}

#[test]
fn query_or_uses_fallback_for_null_and_missing() {
    let doc = document();
    let fallback = Value::from("n/a");
    assert_eq!(doc.query_or("orders.0.note", &fallback), &fallback);
    assert_eq!(doc.query_or("orders.0.missing", &fallback), &fallback);
    assert_eq!(doc.query_or("orders.0.id", &fallback), &Value::from(7));
}
