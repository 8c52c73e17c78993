use std::any::Any;

use uuid::Uuid;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, TypeRef};
use crate::value::Value;

/// [`Uuid`] ↔ its canonical hyphenated string.
pub struct UuidAdapter;

impl TypeAdapter for UuidAdapter {
    fn to_tree(&self, _ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        value
            .downcast_ref::<Uuid>()
            .map(|id| Value::String(id.hyphenated().to_string()))
            .ok_or_else(|| MapperError::downcast(ty.name()))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, _ty: TypeRef) -> Result<Native> {
        let text = value
            .as_string(ctx.mapper().is_strict())
            .map_err(|_| MapperError::wrong_type(ctx.field_name(), "string", value))?;
        Uuid::parse_str(&text)
            .map(|id| Box::new(id) as Native)
            .map_err(|_| MapperError::wrong_type(ctx.field_name(), "uuid string", value))
    }

    fn supported_types(&self) -> Vec<TypeRef> {
        vec![TypeRef::of::<Uuid>()]
    }
}
