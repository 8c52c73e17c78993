use std::any::Any;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, TypeRef};
use crate::number::Number;
use crate::value::Value;

/// Booleans, integers, floats, `char`, `String` and [`Number`].
///
/// Incoming values go through the tree's coercing accessors using the
/// mapper's strictness. Integer targets reject fractional and out-of-range
/// numbers; a `char` needs a string of exactly one character.
pub struct PrimitiveAdapter;

macro_rules! integers_to_tree {
    ($value:expr, $($t:ty),*) => {
        $(if let Some(n) = $value.downcast_ref::<$t>() {
            return Ok(Value::Number(Number::from(*n)));
        })*
    };
}

macro_rules! integers_from_tree {
    ($ty:expr, $number:expr, $fail:expr, $($t:ty),*) => {
        $(if $ty.is::<$t>() {
            let n = $number()?;
            return n
                .as_integral()
                .and_then(|i| <$t>::try_from(i).ok())
                .map(|i| Box::new(i) as Native)
                .ok_or_else($fail);
        })*
    };
}

impl TypeAdapter for PrimitiveAdapter {
    fn to_tree(&self, _ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        if let Some(s) = value.downcast_ref::<String>() {
            return Ok(Value::String(s.clone()));
        }
        if let Some(b) = value.downcast_ref::<bool>() {
            return Ok(Value::Boolean(*b));
        }
        if let Some(c) = value.downcast_ref::<char>() {
            return Ok(Value::String(c.to_string()));
        }
        if let Some(n) = value.downcast_ref::<Number>() {
            return Ok(Value::Number(*n));
        }
        if let Some(f) = value.downcast_ref::<f64>() {
            return Ok(Value::from(*f));
        }
        if let Some(f) = value.downcast_ref::<f32>() {
            return Ok(Value::from(*f));
        }
        integers_to_tree!(value, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
        Err(MapperError::unmappable(ty.name()))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let strict = ctx.mapper().is_strict();
        let field = ctx.field_name();

        if ty.is::<String>() {
            let s = value
                .as_string(strict)
                .map_err(|_| MapperError::wrong_type(field, "string", value))?;
            return Ok(Box::new(s.into_owned()));
        }
        if ty.is::<bool>() {
            let b = value
                .as_boolean(strict)
                .map_err(|_| MapperError::wrong_type(field, "boolean", value))?;
            return Ok(Box::new(b));
        }
        if ty.is::<char>() {
            let s = value
                .as_string(strict)
                .map_err(|_| MapperError::wrong_type(field, "string", value))?;
            let mut chars = s.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Box::new(c)),
                _ => Err(MapperError::wrong_type(field, "string of length 1", value)),
            };
        }

        let number = || {
            value
                .as_number(strict)
                .map_err(|_| MapperError::wrong_type(field, "number", value))
        };
        if ty.is::<Number>() {
            return Ok(Box::new(number()?));
        }
        if ty.is::<f64>() {
            return Ok(Box::new(number()?.as_f64()));
        }
        let out_of_range = || MapperError::wrong_type(field, ty.name(), value);
        if ty.is::<f32>() {
            let narrowed = number()?.as_f64() as f32;
            if !narrowed.is_finite() {
                return Err(out_of_range());
            }
            return Ok(Box::new(narrowed));
        }
        integers_from_tree!(ty, number, out_of_range, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

        Err(MapperError::unmappable(ty.name()))
    }

    fn supported_types(&self) -> Vec<TypeRef> {
        vec![
            TypeRef::of::<bool>(),
            TypeRef::of::<char>(),
            TypeRef::of::<String>(),
            TypeRef::of::<Number>(),
            TypeRef::of::<f32>(),
            TypeRef::of::<f64>(),
            TypeRef::of::<i8>(),
            TypeRef::of::<i16>(),
            TypeRef::of::<i32>(),
            TypeRef::of::<i64>(),
            TypeRef::of::<isize>(),
            TypeRef::of::<u8>(),
            TypeRef::of::<u16>(),
            TypeRef::of::<u32>(),
            TypeRef::of::<u64>(),
            TypeRef::of::<usize>(),
        ]
    }
}
