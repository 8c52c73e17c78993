//! Runtime type descriptors for mappable native types.
//!
//! Rust has no field reflection, so a type participates in mapping by
//! implementing [`Mappable`] and describing its [`Shape`]. The shape tells the
//! mapper which structural strategy applies (optional, sequence, map,
//! enumerated, composite) and carries type-erased function pointers for
//! walking and rebuilding values of that type. Leaf types use the default
//! [`Shape::Opaque`] and rely on a registered adapter.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::array::Array;
use crate::error::{MapperError, Result};
use crate::mapper::spec::{Composite, TypeSpec};
use crate::number::Number;
use crate::object::Object;
use crate::value::Value;

/// A type-erased native value, as passed between the mapper and adapters.
pub type Native = Box<dyn Any + Send + Sync>;

/// A native type the mapper can convert.
pub trait Mappable: Any + Send + Sync {
    /// Structural description of the type. Leaf types keep the default.
    fn shape() -> Shape {
        Shape::Opaque
    }
}

/// Identity, name and shape of a [`Mappable`] type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    shape: fn() -> Shape,
}

impl TypeRef {
    pub fn of<T: Mappable>() -> Self {
        TypeRef {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: T::shape,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

/// How the mapper should walk a type.
///
/// Inner types are referenced lazily through `fn() -> TypeRef` so recursive
/// types can describe themselves.
#[derive(Clone, Copy)]
pub enum Shape {
    /// A leaf. Needs a registered adapter, else it is unmappable.
    Opaque,
    /// [`AnyValue`]: the concrete type is carried at runtime.
    Dynamic,
    /// `Option<T>`: `None` is Null in the tree.
    Optional(OptionalShape),
    /// Ordered or unordered collections mapped to Array.
    Sequence(SequenceShape),
    /// Native fixed-size arrays (`Box<[T]>`), sized to the tree on the way in.
    Array(SequenceShape),
    /// Key/value maps mapped to Object.
    Map(MapShape),
    /// Enumerated constants mapped to their symbolic name.
    Enum(EnumShape),
    /// Structured types mapped field by field.
    Composite(CompositeShape),
}

impl Shape {
    pub fn composite<T: Composite>() -> Self {
        Shape::Composite(CompositeShape {
            spec: TypeSpec::build::<T>,
            construct: construct::<T>,
        })
    }

    pub fn enumerated<T: Enumerated>() -> Self {
        Shape::Enum(EnumShape {
            name_of: enum_name_of::<T>,
            from_name: enum_from_name::<T>,
        })
    }
}

#[derive(Clone, Copy)]
pub struct OptionalShape {
    pub inner: fn() -> TypeRef,
    /// Outer `None` means the value was not an `Option<T>`.
    pub get: fn(&dyn Any) -> Option<Option<&dyn Any>>,
    pub wrap: fn(Option<Native>) -> Result<Native>,
}

#[derive(Clone, Copy)]
pub struct SequenceShape {
    pub element: fn() -> TypeRef,
    pub items: fn(&dyn Any) -> Option<Vec<&dyn Any>>,
    pub collect: fn(Vec<Native>) -> Result<Native>,
}

impl SequenceShape {
    pub fn of<C, T>() -> Self
    where
        C: FromIterator<T> + Send + Sync + 'static,
        T: Mappable,
        for<'a> &'a C: IntoIterator<Item = &'a T>,
    {
        SequenceShape {
            element: TypeRef::of::<T>,
            items: sequence_items::<C, T>,
            collect: sequence_collect::<C, T>,
        }
    }
}

#[derive(Clone, Copy)]
pub struct MapShape {
    pub key: fn() -> TypeRef,
    pub value: fn() -> TypeRef,
    pub entries: fn(&dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>>,
    pub collect: fn(Vec<(Native, Native)>) -> Result<Native>,
}

impl MapShape {
    pub fn of<M, K, V>() -> Self
    where
        M: FromIterator<(K, V)> + Send + Sync + 'static,
        K: Mappable,
        V: Mappable,
        for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
    {
        MapShape {
            key: TypeRef::of::<K>,
            value: TypeRef::of::<V>,
            entries: map_entries::<M, K, V>,
            collect: map_collect::<M, K, V>,
        }
    }
}

#[derive(Clone, Copy)]
pub struct EnumShape {
    pub name_of: fn(&dyn Any) -> Option<&'static str>,
    pub from_name: fn(&str) -> Option<Native>,
}

#[derive(Clone, Copy)]
pub struct CompositeShape {
    pub spec: fn() -> Result<TypeSpec>,
    pub construct: fn() -> Native,
}

/// A closed set of constants, mapped to and from their symbolic names.
pub trait Enumerated: Mappable + Clone {
    const VARIANTS: &'static [Self];

    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().find(|v| v.name() == name).cloned()
    }
}

/// A native value whose concrete type is only known at runtime.
///
/// Used as the element type of untyped containers (`Vec<AnyValue>`,
/// `HashMap<String, AnyValue>`) and for fields that accept any tree shape.
pub struct AnyValue {
    value: Native,
    ty: TypeRef,
}

impl AnyValue {
    pub fn new<T: Mappable>(value: T) -> Self {
        AnyValue {
            value: Box::new(value),
            ty: TypeRef::of::<T>(),
        }
    }

    /// `Value::Null` wrapped as a native value; stands in for absent elements.
    pub fn null() -> Self {
        AnyValue::new(Value::Null)
    }

    pub(crate) fn from_native(value: Native, ty: TypeRef) -> Self {
        AnyValue { value, ty }
    }

    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn is_null(&self) -> bool {
        self.downcast_ref::<Value>().is_some_and(Value::is_null)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let AnyValue { value, ty } = self;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|value| AnyValue { value, ty })
    }

    pub fn as_any(&self) -> &dyn Any {
        &*self.value
    }
}

impl Default for AnyValue {
    fn default() -> Self {
        AnyValue::null()
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyValue({})", self.ty.name())
    }
}

impl Mappable for AnyValue {
    fn shape() -> Shape {
        Shape::Dynamic
    }
}

/// Native type to use for a tree value when no hint names one.
pub fn guess_type(value: &Value) -> Option<TypeRef> {
    match value {
        Value::Null => None,
        Value::Boolean(_) => Some(TypeRef::of::<bool>()),
        Value::Number(_) => Some(TypeRef::of::<Number>()),
        Value::String(_) => Some(TypeRef::of::<String>()),
        Value::Array(_) => Some(TypeRef::of::<Array>()),
        Value::Object(_) => Some(TypeRef::of::<Object>()),
    }
}

/// Unbox a native value into its concrete type.
///
/// # Errors
///
/// Returns [`MapperError::Downcast`] when the box holds another type.
pub fn downcast_native<T: Any>(value: Native) -> Result<T> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| MapperError::downcast(type_name::<T>()))
}

fn construct<T: Composite>() -> Native {
    Box::new(T::default())
}

fn enum_name_of<T: Enumerated>(value: &dyn Any) -> Option<&'static str> {
    value.downcast_ref::<T>().map(Enumerated::name)
}

fn enum_from_name<T: Enumerated>(name: &str) -> Option<Native> {
    T::from_name(name).map(|v| Box::new(v) as Native)
}

fn option_get<T: Mappable>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    value
        .downcast_ref::<Option<T>>()
        .map(|inner| inner.as_ref().map(|v| v as &dyn Any))
}

fn option_wrap<T: Mappable>(inner: Option<Native>) -> Result<Native> {
    let inner = inner.map(downcast_native::<T>).transpose()?;
    Ok(Box::new(inner))
}

fn sequence_items<C, T>(value: &dyn Any) -> Option<Vec<&dyn Any>>
where
    C: Any,
    T: Any,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    value
        .downcast_ref::<C>()
        .map(|items| items.into_iter().map(|item| item as &dyn Any).collect())
}

fn sequence_collect<C, T>(items: Vec<Native>) -> Result<Native>
where
    C: FromIterator<T> + Send + Sync + 'static,
    T: Any,
{
    let collection = items
        .into_iter()
        .map(downcast_native::<T>)
        .collect::<Result<C>>()?;
    Ok(Box::new(collection))
}

fn map_entries<M, K, V>(value: &dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>>
where
    M: Any,
    K: Any,
    V: Any,
    for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
{
    value.downcast_ref::<M>().map(|map| {
        map.into_iter()
            .map(|(k, v)| (k as &dyn Any, v as &dyn Any))
            .collect()
    })
}

fn map_collect<M, K, V>(entries: Vec<(Native, Native)>) -> Result<Native>
where
    M: FromIterator<(K, V)> + Send + Sync + 'static,
    K: Any,
    V: Any,
{
    let map = entries
        .into_iter()
        .map(|(k, v)| Ok((downcast_native::<K>(k)?, downcast_native::<V>(v)?)))
        .collect::<Result<M>>()?;
    Ok(Box::new(map))
}

impl<T: Mappable> Mappable for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(OptionalShape {
            inner: TypeRef::of::<T>,
            get: option_get::<T>,
            wrap: option_wrap::<T>,
        })
    }
}

impl<T: Mappable> Mappable for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(SequenceShape::of::<Vec<T>, T>())
    }
}

impl<T: Mappable> Mappable for VecDeque<T> {
    fn shape() -> Shape {
        Shape::Sequence(SequenceShape::of::<VecDeque<T>, T>())
    }
}

impl<T: Mappable + Eq + Hash> Mappable for HashSet<T> {
    fn shape() -> Shape {
        Shape::Sequence(SequenceShape::of::<HashSet<T>, T>())
    }
}

impl<T: Mappable + Ord> Mappable for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::Sequence(SequenceShape::of::<BTreeSet<T>, T>())
    }
}

impl<T: Mappable> Mappable for Box<[T]> {
    fn shape() -> Shape {
        Shape::Array(SequenceShape::of::<Box<[T]>, T>())
    }
}

impl<K: Mappable + Eq + Hash, V: Mappable> Mappable for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(MapShape::of::<HashMap<K, V>, K, V>())
    }
}

impl<K: Mappable + Ord, V: Mappable> Mappable for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(MapShape::of::<BTreeMap<K, V>, K, V>())
    }
}

impl<K: Mappable + Eq + Hash, V: Mappable> Mappable for IndexMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(MapShape::of::<IndexMap<K, V>, K, V>())
    }
}

macro_rules! leaf {
    ($($t:ty),* $(,)?) => {
        $(impl Mappable for $t {})*
    };
}

leaf!(
    bool, char, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
    Number, Value, Array, Object,
    DateTime<Utc>, NaiveDateTime, NaiveDate,
    Uuid,
);
