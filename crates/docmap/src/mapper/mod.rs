//! Conversion between native values and the value tree.
//!
//! [`Mapper`] resolves an adapter for every value it meets, in this order:
//!
//! 1. the adapter carried by the [`MapperContext`] (a field-level override),
//! 2. the mapper's own overrides, then the shared default registry, by exact type,
//! 3. the structural adapter for the type's [`Shape`] (sequence, map, enum),
//! 4. the fallback composite adapter, which walks the type's [`TypeSpec`].
//!
//! `Option`, [`AnyValue`] and native arrays are unwrapped by the mapper itself
//! before any adapter is consulted.

pub mod adapter;
pub mod adapters;
pub mod context;
pub mod spec;
pub mod types;

use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::array::Array;
use crate::error::{MapperError, Result};
use crate::naming::NamingPolicy;
use crate::value::Value;

use adapter::{AdapterRegistry, TypeAdapter};
use context::MapperContext;
use types::{downcast_native, guess_type, AnyValue, Mappable, Native, Shape, TypeRef};

/// Default date pattern, chrono strftime syntax.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Mapper settings. Loadable from any serde source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub naming_policy: NamingPolicy,
    /// Forbid cross-kind coercion of primitives.
    pub strict: bool,
    /// Drop Null-valued keys of composite fields that also opt in.
    pub omit_null: bool,
    /// Only fields marked `expose` participate.
    pub expose_required: bool,
    pub date_format: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            naming_policy: NamingPolicy::None,
            strict: false,
            omit_null: true,
            expose_required: false,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Converts native values to trees and back.
///
/// A mapper is cheap to create: the default adapters are shared between all
/// instances and each instance only owns its configuration and overrides.
/// Settings are plain fields, so use one mapper per configuration when
/// mapping from several threads.
#[derive(Debug, Clone)]
pub struct Mapper {
    config: MapperConfig,
    defaults: Arc<AdapterRegistry>,
    overrides: AdapterRegistry,
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::new()
    }
}

impl Mapper {
    pub fn new() -> Self {
        Mapper::with_config(MapperConfig::default())
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Mapper {
            config,
            defaults: AdapterRegistry::shared_defaults(),
            overrides: AdapterRegistry::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn naming_policy(&mut self, policy: NamingPolicy) -> &mut Self {
        self.config.naming_policy = policy;
        self
    }

    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.config.strict = strict;
        self
    }

    pub fn omit_null(&mut self, omit: bool) -> &mut Self {
        self.config.omit_null = omit;
        self
    }

    pub fn expose_required(&mut self, required: bool) -> &mut Self {
        self.config.expose_required = required;
        self
    }

    pub fn date_format(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.config.date_format = pattern.into();
        self
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    /// This mapper with strict coercion switched off.
    pub(crate) fn lenient(&self) -> Cow<'_, Mapper> {
        if !self.config.strict {
            return Cow::Borrowed(self);
        }
        let mut lenient = self.clone();
        lenient.config.strict = false;
        Cow::Owned(lenient)
    }

    /// Install an adapter for `ty` on this mapper only. The shared defaults
    /// are left untouched.
    pub fn register(&mut self, ty: TypeRef, adapter: Arc<dyn TypeAdapter>) -> &mut Self {
        debug!(type_name = ty.name(), "registering adapter override");
        self.overrides.register(ty, adapter);
        self
    }

    /// Install an adapter for every type it reports as supported.
    pub fn register_adapter(&mut self, adapter: impl TypeAdapter + 'static) -> &mut Self {
        let adapter: Arc<dyn TypeAdapter> = Arc::new(adapter);
        for ty in adapter.supported_types() {
            self.register(ty, Arc::clone(&adapter));
        }
        self
    }

    /// Registry lookup by exact type: overrides first, then defaults.
    pub fn adapter_for(&self, ty: TypeRef) -> Option<&dyn TypeAdapter> {
        self.overrides.get(ty).or_else(|| self.defaults.get(ty))
    }

    /// Convert a native value into a tree.
    ///
    /// # Errors
    ///
    /// Propagates the first adapter failure; no partial tree is returned.
    pub fn to_tree<T: Mappable>(&self, value: &T) -> Result<Value> {
        self.to_tree_with(&MapperContext::root(self), value, TypeRef::of::<T>())
    }

    /// Convert a tree into a native value. `Null` yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the first failure met while walking the tree, e.g.
    /// [`MapperError::WrongType`] when the tree shape does not fit `T`.
    pub fn from_tree<T: Mappable>(&self, value: &Value) -> Result<Option<T>> {
        self.from_tree_with(&MapperContext::root(self), value, TypeRef::of::<T>())?
            .map(downcast_native::<T>)
            .transpose()
    }

    /// Type-erased [`to_tree`](Self::to_tree) under an explicit context.
    /// Adapters call this to recurse.
    pub fn to_tree_with(
        &self,
        ctx: &MapperContext<'_>,
        value: &dyn Any,
        ty: TypeRef,
    ) -> Result<Value> {
        match ty.shape() {
            Shape::Optional(optional) => {
                match (optional.get)(value).ok_or_else(|| MapperError::downcast(ty.name()))? {
                    Some(inner) => self.to_tree_with(ctx, inner, (optional.inner)()),
                    None => Ok(Value::Null),
                }
            }
            Shape::Dynamic => {
                let any = value
                    .downcast_ref::<AnyValue>()
                    .ok_or_else(|| MapperError::downcast(ty.name()))?;
                self.to_tree_with(ctx, any.as_any(), any.type_ref())
            }
            Shape::Array(array) => {
                let items = (array.items)(value).ok_or_else(|| MapperError::downcast(ty.name()))?;
                let root = MapperContext::root(self);
                let element = (array.element)();
                items
                    .into_iter()
                    .map(|item| self.to_tree_with(&root, item, element))
                    .collect::<Result<Array>>()
                    .map(Value::Array)
            }
            _ => self.resolve(ctx, ty).to_tree(ctx, value, ty),
        }
    }

    /// Type-erased [`from_tree`](Self::from_tree) under an explicit context.
    ///
    /// Returns `None` for native absence. The boxed value always has type `ty`.
    pub fn from_tree_with(
        &self,
        ctx: &MapperContext<'_>,
        value: &Value,
        ty: TypeRef,
    ) -> Result<Option<Native>> {
        let shape = ty.shape();
        if let Shape::Optional(optional) = shape {
            let inner = if value.is_null() {
                None
            } else {
                self.from_tree_with(ctx, value, (optional.inner)())?
            };
            return (optional.wrap)(inner).map(Some);
        }
        if value.is_null() {
            return Ok(None);
        }
        match shape {
            Shape::Dynamic => {
                let hint = ctx.generic_types().first().copied();
                let any = self.from_tree_dynamic(ctx, value, hint)?;
                Ok(Some(Box::new(any)))
            }
            Shape::Array(array) => {
                let items = value
                    .as_array(true)
                    .map_err(|_| MapperError::wrong_type(ctx.field_name(), "array", value))?;
                let natives = self.from_tree_elements(ctx, items.iter(), (array.element)(), None)?;
                (array.collect)(natives).map(Some)
            }
            _ => self.resolve(ctx, ty).from_tree(ctx, value, ty).map(Some),
        }
    }

    /// Map `value` into a runtime-typed native.
    ///
    /// The concrete type is `hint` when given, else guessed from the value's
    /// kind. Null becomes [`AnyValue::null`].
    pub fn from_tree_dynamic(
        &self,
        ctx: &MapperContext<'_>,
        value: &Value,
        hint: Option<TypeRef>,
    ) -> Result<AnyValue> {
        let Some(ty) = hint.or_else(|| guess_type(value)) else {
            return Ok(AnyValue::null());
        };
        Ok(match self.from_tree_with(ctx, value, ty)? {
            Some(native) => AnyValue::from_native(native, ty),
            None => AnyValue::null(),
        })
    }

    /// Map container elements of type `element`.
    ///
    /// Dynamic elements share one concrete type: `hint`, else the type guessed
    /// from the first non-null element. Null elements stay Null when the
    /// element type is [`Value`]; for any other non-optional, non-dynamic
    /// type they are rejected.
    pub(crate) fn from_tree_elements<'v>(
        &self,
        ctx: &MapperContext<'_>,
        values: impl Iterator<Item = &'v Value> + Clone,
        element: TypeRef,
        hint: Option<TypeRef>,
    ) -> Result<Vec<Native>> {
        let root = MapperContext::root(self);
        if let Shape::Dynamic = element.shape() {
            let concrete = hint.or_else(|| {
                values
                    .clone()
                    .find(|v| !v.is_null())
                    .and_then(guess_type)
            });
            return values
                .map(|v| {
                    self.from_tree_dynamic(&root, v, concrete)
                        .map(|any| Box::new(any) as Native)
                })
                .collect();
        }
        let keeps_null = element.is::<Value>();
        values
            .map(|v| {
                if keeps_null && v.is_null() {
                    return Ok(Box::new(Value::Null) as Native);
                }
                self.from_tree_with(&root, v, element)?
                    .ok_or_else(|| MapperError::wrong_type(ctx.field_name(), element.name(), v))
            })
            .collect()
    }

    fn resolve<'s>(&'s self, ctx: &'s MapperContext<'_>, ty: TypeRef) -> &'s dyn TypeAdapter {
        if let Some(adapter) = ctx.adapter() {
            return adapter;
        }
        if let Some(adapter) = self.adapter_for(ty) {
            return adapter;
        }
        trace!(type_name = ty.name(), "no registered adapter, using structural fallback");
        adapters::structural(ty)
    }
}
