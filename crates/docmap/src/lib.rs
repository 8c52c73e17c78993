//! # docmap
//!
//! A JSON-shaped **value tree** with kind-aware coercion, and a **mapper**
//! that converts native Rust values to and from that tree.
//!
//! The tree ([`Value`]) is the common currency for codecs and validators: it
//! models Null, Boolean, Number, String, Array and insertion-ordered Object
//! nodes, and every typed accessor takes a `strict` flag selecting exact-kind
//! access or the lenient coercion table.
//!
//! The mapper walks native values through registered [`TypeAdapter`]s.
//! Composite types describe their fields once ([`Composite::describe`]); the
//! resulting field specs drive naming, ordering, visibility and null
//! omission.
//!
//! ## Quick start
//!
//! ```rust
//! use docmap::{Composite, FieldSet, Mappable, Mapper, NamingPolicy, Shape, Value};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     first_name: String,
//!     age: u32,
//! }
//!
//! impl Mappable for User {
//!     fn shape() -> Shape {
//!         Shape::composite::<Self>()
//!     }
//! }
//!
//! impl Composite for User {
//!     fn describe(fields: &mut FieldSet<Self>) {
//!         fields.field("first_name", |u| &u.first_name, |u| &mut u.first_name);
//!         fields.field("age", |u| &u.age, |u| &mut u.age);
//!     }
//! }
//!
//! let mut mapper = Mapper::new();
//! mapper.naming_policy(NamingPolicy::CamelCase);
//!
//! let user = User { first_name: "Ada".into(), age: 36 };
//! let tree = mapper.to_tree(&user).unwrap();
//! assert_eq!(tree.query("firstName"), Some(&Value::from("Ada")));
//!
//! let back: User = mapper.from_tree(&tree).unwrap().unwrap();
//! assert_eq!(back, user);
//! ```
//!
//! ## Modules
//!
//! - [`value`] - `Value`, `Kind` and the coercing accessors
//! - [`number`], [`array`], [`object`] - payloads of the tree variants
//! - [`path`] - dotted path queries
//! - [`json`] - serde support and `serde_json::Value` conversions
//! - [`naming`] - identifier ↔ tree key policies
//! - [`mapper`] - `Mapper`, field specs, adapters and type descriptors
//! - [`error`] - error types

pub mod array;
pub mod error;
pub mod json;
pub mod mapper;
pub mod naming;
pub mod number;
pub mod object;
pub mod path;
pub mod value;

pub use array::Array;
pub use error::{CoercingError, MapperError, PathError, Result};
pub use mapper::adapter::{AdapterRegistry, TypeAdapter};
pub use mapper::adapters::DateFormat;
pub use mapper::context::MapperContext;
pub use mapper::spec::{Composite, FieldOptions, FieldSet, FieldSpec, TypeSpec};
pub use mapper::types::{AnyValue, Enumerated, Mappable, Native, Shape, TypeRef};
pub use mapper::{Mapper, MapperConfig};
pub use naming::NamingPolicy;
pub use number::Number;
pub use object::Object;
pub use path::Path;
pub use value::{Kind, Value};
