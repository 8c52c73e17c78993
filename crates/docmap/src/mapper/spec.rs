//! Field introspection for composite types.
//!
//! A composite type registers its fields once through [`Composite::describe`].
//! The resulting [`TypeSpec`] (ordered [`FieldSpec`]s plus an optional
//! additional-properties sink) is built on first use and cached process-wide,
//! keyed by type identity. A build failure is cached too and returned on
//! every later lookup until [`reset`] clears the cache.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::adapters::date::DateFormat;
use crate::mapper::types::{Mappable, Native, Shape, TypeRef};
use crate::object::Object;

/// A structured type mapped field by field.
///
/// `Default` provides the blank instance that incoming fields are written
/// into; fields absent from the tree keep their default.
pub trait Composite: Mappable + Default {
    fn describe(fields: &mut FieldSet<Self>);
}

/// Declarative per-field configuration.
#[derive(Clone)]
pub struct FieldOptions {
    /// Explicit tree key. Bypasses the naming policy.
    pub name: Option<String>,
    /// Sort key; ties keep declaration order.
    pub order: i32,
    /// Element/value type hints for untyped containers and [`AnyValue`](crate::AnyValue) fields.
    pub generic: Vec<TypeRef>,
    pub expose: bool,
    pub hidden: bool,
    /// Skip the key when the mapped value is Null (and the mapper agrees).
    pub omit_null: bool,
    pub adapter: Option<Arc<dyn TypeAdapter>>,
    pub date: Option<DateFormat>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions {
            name: None,
            order: 0,
            generic: Vec::new(),
            expose: false,
            hidden: false,
            omit_null: true,
            adapter: None,
            date: None,
        }
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("generic", &self.generic)
            .field("expose", &self.expose)
            .field("hidden", &self.hidden)
            .field("omit_null", &self.omit_null)
            .field("adapter", &self.adapter.is_some())
            .field("date", &self.date)
            .finish()
    }
}

impl FieldOptions {
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn order(&mut self, order: i32) -> &mut Self {
        self.order = order;
        self
    }

    /// Append a generic type hint.
    pub fn generic<T: Mappable>(&mut self) -> &mut Self {
        self.generic.push(TypeRef::of::<T>());
        self
    }

    pub fn expose(&mut self) -> &mut Self {
        self.expose = true;
        self
    }

    pub fn hidden(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub fn omit_null(&mut self, omit: bool) -> &mut Self {
        self.omit_null = omit;
        self
    }

    pub fn adapter(&mut self, adapter: impl TypeAdapter + 'static) -> &mut Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    pub fn date(&mut self, format: DateFormat) -> &mut Self {
        self.date = Some(format);
        self
    }
}

/// Erased access to one field of an owner value.
pub(crate) trait FieldAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any>;
    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
    /// Store `value` into the field. `false` on an owner or value type mismatch.
    fn set(&self, owner: &mut dyn Any, value: Native) -> bool;
}

struct Accessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: Any, F: Any> FieldAccess for Accessor<T, F> {
    fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        owner
            .downcast_ref::<T>()
            .map(|owner| (self.get)(owner) as &dyn Any)
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        owner
            .downcast_mut::<T>()
            .map(|owner| (self.get_mut)(owner) as &mut dyn Any)
    }

    fn set(&self, owner: &mut dyn Any, value: Native) -> bool {
        match (owner.downcast_mut::<T>(), value.downcast::<F>()) {
            (Some(owner), Ok(value)) => {
                *(self.get_mut)(owner) = *value;
                true
            }
            _ => false,
        }
    }
}

/// A field reached through an embedded base value.
struct Projected {
    base: Arc<dyn FieldAccess>,
    field: Arc<dyn FieldAccess>,
}

impl FieldAccess for Projected {
    fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        self.base.get(owner).and_then(|base| self.field.get(base))
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.base
            .get_mut(owner)
            .and_then(|base| self.field.get_mut(base))
    }

    fn set(&self, owner: &mut dyn Any, value: Native) -> bool {
        match self.base.get_mut(owner) {
            Some(base) => self.field.set(base, value),
            None => false,
        }
    }
}

fn project(base: &Arc<dyn FieldAccess>, field: Arc<dyn FieldAccess>) -> Arc<dyn FieldAccess> {
    Arc::new(Projected {
        base: Arc::clone(base),
        field,
    })
}

struct FieldDecl {
    ident: &'static str,
    ty: TypeRef,
    access: Arc<dyn FieldAccess>,
    options: FieldOptions,
}

struct SinkDecl {
    ident: &'static str,
    access: Arc<dyn FieldAccess>,
}

/// Registration surface handed to [`Composite::describe`].
pub struct FieldSet<T> {
    inherited: Vec<FieldDecl>,
    own: Vec<FieldDecl>,
    sinks: Vec<SinkDecl>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Composite> FieldSet<T> {
    fn new() -> Self {
        FieldSet {
            inherited: Vec::new(),
            own: Vec::new(),
            sinks: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declare a mapped field. Returns its options for builder-style
    /// configuration.
    ///
    /// # Arguments
    ///
    /// * `ident` - Native identifier; the naming policy derives the tree key from it.
    /// * `get` / `get_mut` - Accessors projecting the field out of the owner.
    pub fn field<F: Mappable>(
        &mut self,
        ident: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut FieldOptions {
        self.field_with(ident, get, get_mut, FieldOptions::default())
    }

    /// Declare a mapped field with a prepared options literal.
    pub fn field_with<F: Mappable>(
        &mut self,
        ident: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
        options: FieldOptions,
    ) -> &mut FieldOptions {
        let index = self.own.len();
        self.own.push(FieldDecl {
            ident,
            ty: TypeRef::of::<F>(),
            access: Arc::new(Accessor { get, get_mut }),
            options,
        });
        &mut self.own[index].options
    }

    /// Declare the additional-properties sink: receives unmatched tree keys
    /// and is re-emitted on the way out. At most one per type, including
    /// inherited ones.
    pub fn additional(
        &mut self,
        ident: &'static str,
        get: fn(&T) -> &Object,
        get_mut: fn(&mut T) -> &mut Object,
    ) {
        self.sinks.push(SinkDecl {
            ident,
            access: Arc::new(Accessor { get, get_mut }),
        });
    }

    /// Splice in the fields of an embedded base type. Base fields are
    /// discovered before this type's own fields, the most general ancestor
    /// first.
    pub fn inherit<B: Composite>(&mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) {
        let mut base = FieldSet::<B>::new();
        B::describe(&mut base);
        let through: Arc<dyn FieldAccess> = Arc::new(Accessor { get, get_mut });

        for decl in base.inherited.into_iter().chain(base.own) {
            self.inherited.push(FieldDecl {
                access: project(&through, decl.access),
                ..decl
            });
        }
        for sink in base.sinks {
            self.sinks.push(SinkDecl {
                ident: sink.ident,
                access: project(&through, sink.access),
            });
        }
    }
}

/// Mapping metadata for one field of a composite type.
pub struct FieldSpec {
    ident: &'static str,
    ty: TypeRef,
    access: Arc<dyn FieldAccess>,
    options: FieldOptions,
}

impl FieldSpec {
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Explicit tree key, if one was declared.
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    pub fn order(&self) -> i32 {
        self.options.order
    }

    pub fn is_expose(&self) -> bool {
        self.options.expose
    }

    pub fn is_hidden(&self) -> bool {
        self.options.hidden
    }

    pub fn should_omit_null(&self) -> bool {
        self.options.omit_null
    }

    pub fn adapter(&self) -> Option<&Arc<dyn TypeAdapter>> {
        self.options.adapter.as_ref()
    }

    pub fn generic(&self) -> &[TypeRef] {
        &self.options.generic
    }

    pub fn date_format(&self) -> Option<&DateFormat> {
        self.options.date.as_ref()
    }

    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub(crate) fn get<'a>(&self, owner: &'a dyn Any) -> Result<&'a dyn Any> {
        self.access
            .get(owner)
            .ok_or_else(|| MapperError::downcast(self.ty.name()))
    }

    pub(crate) fn set(&self, owner: &mut dyn Any, value: Native) -> Result<()> {
        if self.access.set(owner, value) {
            Ok(())
        } else {
            Err(MapperError::downcast(self.ty.name()))
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("ident", &self.ident)
            .field("ty", &self.ty)
            .field("options", &self.options)
            .finish()
    }
}

/// The additional-properties sink of a composite type.
pub struct AdditionalSpec {
    ident: &'static str,
    access: Arc<dyn FieldAccess>,
}

impl AdditionalSpec {
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub(crate) fn get<'a>(&self, owner: &'a dyn Any) -> Result<&'a Object> {
        self.access
            .get(owner)
            .and_then(|sink| sink.downcast_ref::<Object>())
            .ok_or_else(|| MapperError::downcast(type_name::<Object>()))
    }

    pub(crate) fn set(&self, owner: &mut dyn Any, value: Object) -> Result<()> {
        if self.access.set(owner, Box::new(value)) {
            Ok(())
        } else {
            Err(MapperError::downcast(type_name::<Object>()))
        }
    }
}

/// Ordered field specs of one composite type.
pub struct TypeSpec {
    type_name: &'static str,
    fields: Vec<FieldSpec>,
    additional: Option<AdditionalSpec>,
}

type SpecCache = RwLock<HashMap<TypeId, Result<Arc<TypeSpec>>>>;

static SPEC_CACHE: LazyLock<SpecCache> = LazyLock::new(|| RwLock::new(HashMap::new()));

impl TypeSpec {
    /// Run `T::describe` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::InvalidSpec`] for more than one sink, a field
    /// identifier declared twice, or a date pattern chrono rejects.
    pub fn build<T: Composite>() -> Result<TypeSpec> {
        let type_name = type_name::<T>();
        let mut set = FieldSet::<T>::new();
        T::describe(&mut set);
        let FieldSet {
            inherited,
            own,
            mut sinks,
            ..
        } = set;

        if sinks.len() > 1 {
            let idents: Vec<&str> = sinks.iter().map(|s| s.ident).collect();
            return Err(MapperError::invalid_spec(
                type_name,
                format!(
                    "at most one additional-properties field is allowed, found {}",
                    idents.join(", ")
                ),
            ));
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(inherited.len() + own.len());
        for decl in inherited.into_iter().chain(own) {
            if !seen.insert(decl.ident) {
                return Err(MapperError::invalid_spec(
                    type_name,
                    format!("field '{}' is declared more than once", decl.ident),
                ));
            }
            if let Some(date) = &decl.options.date {
                date.validate().map_err(|e| {
                    MapperError::invalid_spec(type_name, format!("field '{}': {e}", decl.ident))
                })?;
            }
            fields.push(FieldSpec {
                ident: decl.ident,
                ty: decl.ty,
                access: decl.access,
                options: decl.options,
            });
        }
        fields.sort_by_key(FieldSpec::order);

        Ok(TypeSpec {
            type_name,
            fields,
            additional: sinks.pop().map(|sink| AdditionalSpec {
                ident: sink.ident,
                access: sink.access,
            }),
        })
    }

    /// Cached spec for a composite type, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnmappableType`] when `ty` is not composite, or
    /// the (cached) build failure.
    pub fn of(ty: TypeRef) -> Result<Arc<TypeSpec>> {
        let Shape::Composite(shape) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };

        if let Some(cached) = SPEC_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ty.id())
        {
            return cached.clone();
        }

        let built = (shape.spec)().map(Arc::new);
        match &built {
            Ok(spec) => debug!(
                type_name = ty.name(),
                fields = spec.fields.len(),
                sink = spec.additional.is_some(),
                "built field specs"
            ),
            Err(error) => warn!(type_name = ty.name(), %error, "field spec construction failed"),
        }

        // Another thread may have finished first; keep whichever landed first.
        SPEC_CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ty.id())
            .or_insert(built)
            .clone()
    }

    pub fn of_type<T: Mappable>() -> Result<Arc<TypeSpec>> {
        TypeSpec::of(TypeRef::of::<T>())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, ident: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.ident == ident)
    }

    pub fn additional(&self) -> Option<&AdditionalSpec> {
        self.additional.as_ref()
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("additional", &self.additional.as_ref().map(|a| a.ident))
            .finish()
    }
}

/// Whether a spec (or a cached failure) exists for `ty`.
pub fn is_cached(ty: TypeRef) -> bool {
    SPEC_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&ty.id())
}

/// Drop every cached spec and cached failure.
pub fn reset() {
    let mut cache = SPEC_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    debug!(entries = cache.len(), "resetting field spec cache");
    cache.clear();
}
