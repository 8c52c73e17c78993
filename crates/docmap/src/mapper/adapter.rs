//! The type adapter capability and the type-identity-keyed registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::Result;
use crate::mapper::adapters;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, TypeRef};
use crate::value::Value;

/// A bidirectional converter between a native type and the value tree.
///
/// Both directions receive the target/source [`TypeRef`] so one adapter can
/// serve a family of types. `from_tree` never sees `Null`: absence is handled
/// by the mapper before dispatch.
pub trait TypeAdapter: Send + Sync {
    /// Convert a native value into a tree.
    ///
    /// # Errors
    ///
    /// Any [`MapperError`](crate::MapperError) aborts the enclosing mapping call.
    fn to_tree(&self, ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value>;

    /// Convert a tree into a native value of type `ty`.
    ///
    /// The returned box must hold exactly `ty`.
    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native>;

    /// Types this adapter registers for by default.
    fn supported_types(&self) -> Vec<TypeRef> {
        Vec::new()
    }
}

/// Adapters keyed by exact native type.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TypeId, Arc<dyn TypeAdapter>>,
}

static DEFAULTS: LazyLock<Arc<AdapterRegistry>> =
    LazyLock::new(|| Arc::new(AdapterRegistry::with_defaults()));

impl AdapterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        AdapterRegistry::default()
    }

    /// A registry holding the built-in adapters for tree types, primitives,
    /// dates and identifiers.
    pub fn with_defaults() -> Self {
        let mut registry = AdapterRegistry::new();
        adapters::install_defaults(&mut registry);
        registry
    }

    /// The process-wide default registry, built once and shared by every
    /// [`Mapper`](crate::Mapper).
    pub fn shared_defaults() -> Arc<AdapterRegistry> {
        Arc::clone(&DEFAULTS)
    }

    /// Bind `adapter` to `ty`, replacing any previous binding.
    pub fn register(&mut self, ty: TypeRef, adapter: Arc<dyn TypeAdapter>) {
        self.adapters.insert(ty.id(), adapter);
    }

    /// Bind `adapter` to each of its [`supported_types`](TypeAdapter::supported_types).
    pub fn register_adapter(&mut self, adapter: Arc<dyn TypeAdapter>) {
        for ty in adapter.supported_types() {
            self.register(ty, Arc::clone(&adapter));
        }
    }

    pub fn get(&self, ty: TypeRef) -> Option<&dyn TypeAdapter> {
        self.adapters.get(&ty.id()).map(|adapter| &**adapter)
    }

    pub fn contains(&self, ty: TypeRef) -> bool {
        self.adapters.contains_key(&ty.id())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.len())
            .finish()
    }
}
