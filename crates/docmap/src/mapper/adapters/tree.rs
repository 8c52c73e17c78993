use std::any::Any;

use crate::array::Array;
use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, TypeRef};
use crate::object::Object;
use crate::value::Value;

/// Passes tree values through. Requesting `Array` or `Object` requires a tree
/// of exactly that kind.
pub struct TreeAdapter;

impl TypeAdapter for TreeAdapter {
    fn to_tree(&self, _ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        if let Some(value) = value.downcast_ref::<Value>() {
            return Ok(value.clone());
        }
        if let Some(array) = value.downcast_ref::<Array>() {
            return Ok(Value::Array(array.clone()));
        }
        if let Some(object) = value.downcast_ref::<Object>() {
            return Ok(Value::Object(object.clone()));
        }
        Err(MapperError::unmappable(ty.name()))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        if ty.is::<Value>() {
            return Ok(Box::new(value.clone()));
        }
        if ty.is::<Array>() {
            return match value {
                Value::Array(array) => Ok(Box::new(array.clone())),
                other => Err(MapperError::wrong_type(ctx.field_name(), "array", other)),
            };
        }
        if ty.is::<Object>() {
            return match value {
                Value::Object(object) => Ok(Box::new(object.clone())),
                other => Err(MapperError::wrong_type(ctx.field_name(), "object", other)),
            };
        }
        Err(MapperError::unmappable(ty.name()))
    }

    fn supported_types(&self) -> Vec<TypeRef> {
        vec![
            TypeRef::of::<Value>(),
            TypeRef::of::<Array>(),
            TypeRef::of::<Object>(),
        ]
    }
}
