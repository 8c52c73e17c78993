use std::any::Any;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, Shape, TypeRef};
use crate::object::Object;
use crate::value::Value;

/// Sequences (`Vec`, `VecDeque`, sets) ↔ Array.
///
/// Elements are converted with a root context, so field-level options do not
/// reach them. Untyped (`AnyValue`) elements take their type from the
/// field's first generic hint, else from the first non-null element.
pub struct CollectionAdapter;

impl TypeAdapter for CollectionAdapter {
    fn to_tree(&self, ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        let Shape::Sequence(sequence) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let items = (sequence.items)(value).ok_or_else(|| MapperError::downcast(ty.name()))?;
        let mapper = ctx.mapper();
        let root = MapperContext::root(mapper);
        let element = (sequence.element)();
        items
            .into_iter()
            .map(|item| mapper.to_tree_with(&root, item, element))
            .collect::<Result<_>>()
            .map(Value::Array)
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let Shape::Sequence(sequence) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let mapper = ctx.mapper();
        let array = value
            .as_array(mapper.is_strict())
            .map_err(|_| MapperError::wrong_type(ctx.field_name(), "array", value))?;
        let hint = ctx.generic_types().first().copied();
        let natives = mapper.from_tree_elements(ctx, array.iter(), (sequence.element)(), hint)?;
        (sequence.collect)(natives)
    }
}

/// Maps (`HashMap`, `BTreeMap`, `IndexMap`) ↔ Object.
///
/// Keys are rendered to tree primitives and then to their string form on the
/// way out, and parsed back from `Value::String` on the way in, with lenient
/// coercion even under a strict mapper. Untyped values
/// resolve like untyped collection elements, using the second generic hint.
pub struct MapAdapter;

impl TypeAdapter for MapAdapter {
    fn to_tree(&self, ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        let Shape::Map(map) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let entries = (map.entries)(value).ok_or_else(|| MapperError::downcast(ty.name()))?;
        let mapper = ctx.mapper();
        let root = MapperContext::root(mapper);
        let (key_ty, value_ty) = ((map.key)(), (map.value)());

        let mut object = Object::new();
        for (key, item) in entries {
            let key = mapper.to_tree_with(&root, key, key_ty)?;
            let key = key
                .as_string(false)
                .map_err(|_| MapperError::wrong_type(ctx.field_name(), "string key", &key))?
                .into_owned();
            object.set(key, mapper.to_tree_with(&root, item, value_ty)?);
        }
        Ok(Value::Object(object))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let Shape::Map(map) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let mapper = ctx.mapper();
        let object = value
            .as_object(mapper.is_strict())
            .map_err(|_| MapperError::wrong_type(ctx.field_name(), "object", value))?;
        // Object keys are always strings, so they parse leniently in any mode.
        let key_mapper = mapper.lenient();
        let key_root = MapperContext::root(&key_mapper);
        let key_ty = (map.key)();
        let hint = ctx.generic_types().get(1).copied();

        let values = mapper.from_tree_elements(ctx, object.values(), (map.value)(), hint)?;
        let mut entries = Vec::with_capacity(object.len());
        for (key, native) in object.keys().zip(values) {
            let key_tree = Value::String(key.clone());
            let key = key_mapper
                .from_tree_with(&key_root, &key_tree, key_ty)?
                .ok_or_else(|| MapperError::wrong_type(ctx.field_name(), key_ty.name(), &key_tree))?;
            entries.push((key, native));
        }
        (map.collect)(entries)
    }
}
