//! Per-call mapping context.

use std::sync::Arc;

use crate::mapper::adapter::TypeAdapter;
use crate::mapper::adapters::date::DateFormat;
use crate::mapper::spec::FieldSpec;
use crate::mapper::types::TypeRef;
use crate::mapper::Mapper;

/// State for one conversion step: the mapper, the field being converted (none
/// at the root and for container elements) and an adapter override.
#[derive(Clone)]
pub struct MapperContext<'a> {
    mapper: &'a Mapper,
    field: Option<&'a FieldSpec>,
    adapter: Option<Arc<dyn TypeAdapter>>,
}

impl<'a> MapperContext<'a> {
    pub fn root(mapper: &'a Mapper) -> Self {
        MapperContext {
            mapper,
            field: None,
            adapter: None,
        }
    }

    /// Context for a composite field; picks up the field's explicit adapter.
    pub fn for_field(mapper: &'a Mapper, field: &'a FieldSpec) -> Self {
        MapperContext {
            mapper,
            field: Some(field),
            adapter: field.adapter().cloned(),
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn TypeAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn mapper(&self) -> &'a Mapper {
        self.mapper
    }

    pub fn field(&self) -> Option<&'a FieldSpec> {
        self.field
    }

    /// Native identifier of the current field, used in error messages.
    pub fn field_name(&self) -> Option<&'a str> {
        self.field.map(FieldSpec::ident)
    }

    pub fn is_nested(&self) -> bool {
        self.field.is_some()
    }

    pub fn generic_types(&self) -> &'a [TypeRef] {
        self.field.map(FieldSpec::generic).unwrap_or(&[])
    }

    pub fn date_format(&self) -> Option<&'a DateFormat> {
        self.field.and_then(FieldSpec::date_format)
    }

    pub fn adapter(&self) -> Option<&dyn TypeAdapter> {
        self.adapter.as_deref()
    }
}
