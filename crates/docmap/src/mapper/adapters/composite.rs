use std::any::Any;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::spec::{FieldSpec, TypeSpec};
use crate::mapper::types::{Native, Shape, TypeRef};
use crate::mapper::Mapper;
use crate::object::Object;
use crate::value::Value;

/// Field-by-field mapping of [`Composite`](crate::Composite) types; the last
/// resort for any type without a more specific adapter.
///
/// Outgoing, every participating field becomes one key (Null values are
/// skipped when both the field and the mapper omit nulls) and the sink is
/// merged in last. Incoming, each key is matched against explicit field
/// names, then against the naming-policy keys of the remaining fields; keys
/// that match nothing go to the sink, or are dropped when there is none.
pub struct CompositeAdapter;

fn participates(mapper: &Mapper, field: &FieldSpec) -> bool {
    if mapper.config().expose_required {
        field.is_expose()
    } else {
        !field.is_hidden()
    }
}

impl TypeAdapter for CompositeAdapter {
    fn to_tree(&self, ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        let spec = TypeSpec::of(ty)?;
        let mapper = ctx.mapper();
        let config = mapper.config();

        let mut object = Object::new();
        for field in spec.fields() {
            if !participates(mapper, field) {
                continue;
            }
            let key = match field.name() {
                Some(name) => name.to_string(),
                None => config.naming_policy.to_tree_key(field.ident()),
            };
            let field_ctx = MapperContext::for_field(mapper, field);
            let tree = mapper.to_tree_with(&field_ctx, field.get(value)?, field.type_ref())?;
            if tree.is_null() && config.omit_null && field.should_omit_null() {
                continue;
            }
            object.set(key, tree);
        }

        if let Some(sink) = spec.additional() {
            for (key, extra) in sink.get(value)? {
                object.set(key.clone(), extra.clone());
            }
        }
        Ok(Value::Object(object))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let Shape::Composite(shape) = ty.shape() else {
            return Err(MapperError::unmappable(ty.name()));
        };
        let Value::Object(object) = value else {
            return Err(MapperError::wrong_type(ctx.field_name(), "object", value));
        };
        let spec = TypeSpec::of(ty)?;
        let mapper = ctx.mapper();
        let policy = mapper.config().naming_policy;
        let idents: Vec<&str> = spec.fields().iter().map(FieldSpec::ident).collect();

        let mut target = (shape.construct)();
        let mut extra = spec.additional().map(|_| Object::new());

        for (key, item) in object {
            let explicit = spec.fields().iter().find(|f| f.name() == Some(key.as_str()));
            let field = explicit.or_else(|| {
                let ident = policy.from_tree_key(key, &idents);
                spec.fields()
                    .iter()
                    .find(|f| f.name().is_none() && f.ident() == ident)
            });

            match field {
                Some(field) if participates(mapper, field) => {
                    let field_ctx = MapperContext::for_field(mapper, field);
                    if let Some(native) = mapper.from_tree_with(&field_ctx, item, field.type_ref())? {
                        field.set(&mut *target, native)?;
                    }
                }
                Some(_) => {}
                None => {
                    if let Some(extra) = extra.as_mut() {
                        extra.set(key.clone(), item.clone());
                    }
                }
            }
        }

        if let (Some(sink), Some(extra)) = (spec.additional(), extra) {
            sink.set(&mut *target, extra)?;
        }
        Ok(target)
    }
}
