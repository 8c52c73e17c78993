use std::any::Any;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, Shape, TypeRef};
use crate::value::Value;

/// [`Enumerated`](crate::Enumerated) constants ↔ their symbolic name.
///
/// The incoming value must be a String regardless of strictness.
pub struct EnumAdapter;

impl TypeAdapter for EnumAdapter {
    fn to_tree(&self, _ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        let Shape::Enum(shape) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let name = (shape.name_of)(value).ok_or_else(|| MapperError::downcast(ty.name()))?;
        Ok(Value::String(name.to_string()))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let Shape::Enum(shape) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let Value::String(literal) = value else {
            return Err(MapperError::wrong_type(ctx.field_name(), "string", value));
        };
        (shape.from_name)(literal).ok_or_else(|| MapperError::EnumValue {
            type_name: ty.name().to_string(),
            literal: literal.clone(),
        })
    }
}
