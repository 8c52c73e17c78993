//! Built-in type adapters.
//!
//! - [`tree`] - value tree types pass through unchanged
//! - [`primitive`] - booleans, numbers, characters, strings
//! - [`collection`] - sequences ↔ Array, maps ↔ Object
//! - [`date`] - chrono date/time values ↔ formatted string or epoch number
//! - [`enumeration`] - enumerated constants ↔ symbolic name
//! - [`identifier`] - UUIDs ↔ canonical string
//! - [`composite`] - field-by-field fallback for structured types

pub mod collection;
pub mod composite;
pub mod date;
pub mod enumeration;
pub mod identifier;
pub mod primitive;
pub mod tree;

use std::sync::Arc;

use crate::mapper::adapter::{AdapterRegistry, TypeAdapter};
use crate::mapper::types::{Shape, TypeRef};

pub use collection::{CollectionAdapter, MapAdapter};
pub use composite::CompositeAdapter;
pub use date::{DateAdapter, DateFormat};
pub use enumeration::EnumAdapter;
pub use identifier::UuidAdapter;
pub use primitive::PrimitiveAdapter;
pub use tree::TreeAdapter;

static COLLECTION: CollectionAdapter = CollectionAdapter;
static MAP: MapAdapter = MapAdapter;
static ENUM: EnumAdapter = EnumAdapter;
static COMPOSITE: CompositeAdapter = CompositeAdapter;

pub(crate) fn install_defaults(registry: &mut AdapterRegistry) {
    registry.register_adapter(Arc::new(TreeAdapter));
    registry.register_adapter(Arc::new(PrimitiveAdapter));
    registry.register_adapter(Arc::new(DateAdapter));
    registry.register_adapter(Arc::new(UuidAdapter));
}

/// Adapter chosen by shape when no adapter is registered for the exact type.
pub(crate) fn structural(ty: TypeRef) -> &'static dyn TypeAdapter {
    match ty.shape() {
        Shape::Sequence(_) => &COLLECTION,
        Shape::Map(_) => &MAP,
        Shape::Enum(_) => &ENUM,
        _ => &COMPOSITE,
    }
}
