use std::sync::{Arc, Barrier};
use std::thread;

use docmap::mapper::spec::TypeSpec;
use docmap::{Composite, FieldOptions, FieldSet, Mappable, MapperError, Shape, TypeRef};

// ============================================================================
// Introspection
// ============================================================================

#[derive(Debug, Default)]
struct Profile {
    handle: String,
    aliases: Vec<String>,
    score: i64,
    secret: String,
}

impl Mappable for Profile {
    fn shape() -> Shape {
        Shape::composite::<Self>()
    }
}

impl Composite for Profile {
    fn describe(fields: &mut FieldSet<Self>) {
        fields
            .field("handle", |p| &p.handle, |p| &mut p.handle)
            .name("user")
            .order(1)
            .expose();
        fields
            .field("aliases", |p| &p.aliases, |p| &mut p.aliases)
            .generic::<String>();
        let mut options = FieldOptions::default();
        options.omit_null(false);
        fields.field_with("score", |p| &p.score, |p| &mut p.score, options);
        fields.field("secret", |p| &p.secret, |p| &mut p.secret).hidden();
    }
}

#[test]
fn field_specs_carry_their_options() {
    let spec = TypeSpec::of_type::<Profile>().unwrap();
    let handle = spec.field("handle").unwrap();
    assert_eq!(handle.name(), Some("user"));
    assert_eq!(handle.order(), 1);
    assert!(handle.is_expose());
    assert!(handle.should_omit_null());

    let aliases = spec.field("aliases").unwrap();
    assert_eq!(aliases.generic(), [TypeRef::of::<String>()]);
    assert_eq!(aliases.type_ref(), TypeRef::of::<Vec<String>>());

    assert!(!spec.field("score").unwrap().should_omit_null());
    assert!(spec.field("secret").unwrap().is_hidden());
    assert!(spec.additional().is_none());
}

#[test]
fn field_specs_are_sorted_by_order() {
    let spec = TypeSpec::of_type::<Profile>().unwrap();
    let idents: Vec<&str> = spec.fields().iter().map(|f| f.ident()).collect();
    assert_eq!(idents, ["aliases", "score", "secret", "handle"]);
}

#[test]
fn repeated_lookups_share_one_spec() {
    let first = TypeSpec::of_type::<Profile>().unwrap();
    let second = TypeSpec::of_type::<Profile>().unwrap();
    assert_eq!(first.type_name(), second.type_name());
    assert_eq!(first.fields().len(), 4);
    assert!(Arc::ptr_eq(&first, &second));
}

#[derive(Debug, Default)]
struct Contended {
    left: i32,
    right: String,
}

impl Mappable for Contended {
    fn shape() -> Shape {
        Shape::composite::<Self>()
    }
}

impl Composite for Contended {
    fn describe(fields: &mut FieldSet<Self>) {
        fields.field("left", |c| &c.left, |c| &mut c.left);
        fields.field("right", |c| &c.right, |c| &mut c.right);
    }
}

#[test]
fn concurrent_first_lookups_share_one_spec() {
    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let specs: Vec<Arc<TypeSpec>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    TypeSpec::of_type::<Contended>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });
    assert_eq!(specs[0].fields().len(), 2);
    assert!(specs.iter().all(|spec| Arc::ptr_eq(spec, &specs[0])));
}

#[test]
fn non_composite_has_no_spec() {
    assert!(matches!(
        TypeSpec::of_type::<i32>(),
        Err(MapperError::UnmappableType { .. })
    ));
}

#[test]
fn default_options() {
    let options = FieldOptions::default();
    assert_eq!(options.name, None);
    assert_eq!(options.order, 0);
    assert!(options.omit_null);
    assert!(!options.expose);
    assert!(!options.hidden);
    assert!(options.generic.is_empty());
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Default)]
struct Twice {
    a: i32,
}

impl Mappable for Twice {
    fn shape() -> Shape {
        Shape::composite::<Self>()
    }
}

impl Composite for Twice {
    fn describe(fields: &mut FieldSet<Self>) {
        fields.field("a", |t| &t.a, |t| &mut t.a);
        fields.field("a", |t| &t.a, |t| &mut t.a).name("other");
    }
}

#[test]
fn duplicate_identifier_is_invalid() {
    let err = TypeSpec::of_type::<Twice>().unwrap_err();
    match err {
        MapperError::InvalidSpec { type_name, message } => {
            assert!(type_name.ends_with("Twice"));
            assert!(message.contains("'a'"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
