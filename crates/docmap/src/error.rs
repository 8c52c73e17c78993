//! Error types for value coercion, path parsing and mapping operations.

use thiserror::Error;

use crate::value::{Kind, Value};

/// A typed accessor asked for a kind the underlying value cannot provide.
///
/// Raised on any cross-kind access in strict mode, and in lenient mode when no
/// coercion rule exists or the rule rejects the concrete value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercingError {
    /// No rule converts `found` into `requested`, or strict mode forbids it.
    #[error("type '{found}' can not be coerced into type '{requested}' or strict mode prohibits type coercing")]
    Kind { requested: Kind, found: Kind },

    /// A rule exists but this particular value does not satisfy it.
    #[error("value {value} can not be coerced into type '{requested}'")]
    Value { requested: Kind, value: String },
}

impl CoercingError {
    pub(crate) fn kind(requested: Kind, value: &Value) -> Self {
        CoercingError::Kind {
            requested,
            found: value.kind(),
        }
    }

    pub(crate) fn value(requested: Kind, value: &Value) -> Self {
        CoercingError::Value {
            requested,
            value: value.to_string(),
        }
    }

    /// The kind the caller asked for.
    pub fn requested(&self) -> Kind {
        match self {
            CoercingError::Kind { requested, .. } | CoercingError::Value { requested, .. } => {
                *requested
            }
        }
    }
}

/// A dotted path string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid path '{path}': {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: &'static str,
}

/// Errors raised while converting between native values and the value tree.
///
/// Every variant aborts the enclosing `to_tree`/`from_tree` call. The type is
/// `Clone` because failed field specs are cached and handed out again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// The tree kind did not match what the target type requires.
    #[error("received wrong type{}, expected {expected} but received {actual}", for_field(.field))]
    WrongType {
        field: Option<String>,
        expected: String,
        actual: String,
    },

    /// No adapter, not enumerated and not composite.
    #[error("unmappable type '{type_name}'")]
    UnmappableType { type_name: String },

    /// A symbolic name matched none of the enumerated constants.
    #[error("there is no enum constant '{literal}' in '{type_name}'")]
    EnumValue { type_name: String, literal: String },

    /// A date string did not match the active format.
    #[error("failed to parse date '{input}' with format '{pattern}'{}", for_field(.field))]
    DateParse {
        input: String,
        pattern: String,
        field: Option<String>,
    },

    /// The date format pattern cannot be rendered by chrono.
    #[error("invalid date format pattern '{0}'")]
    InvalidDateFormat(String),

    /// A composite type's field registration is inconsistent.
    #[error("invalid field specification for '{type_name}': {message}")]
    InvalidSpec { type_name: String, message: String },

    /// An adapter produced a native value of an unexpected type.
    #[error("expected a native value of type '{expected}'")]
    Downcast { expected: String },

    #[error(transparent)]
    Coercing(#[from] CoercingError),

    /// Free-form failure raised by a user adapter.
    #[error("{0}")]
    Custom(String),
}

impl MapperError {
    pub(crate) fn wrong_type(field: Option<&str>, expected: impl Into<String>, actual: &Value) -> Self {
        MapperError::WrongType {
            field: field.map(str::to_string),
            expected: expected.into(),
            actual: actual.kind().to_string(),
        }
    }

    pub(crate) fn unmappable(type_name: &str) -> Self {
        MapperError::UnmappableType {
            type_name: type_name.to_string(),
        }
    }

    pub(crate) fn downcast(expected: &str) -> Self {
        MapperError::Downcast {
            expected: expected.to_string(),
        }
    }

    pub(crate) fn invalid_spec(type_name: &str, message: impl Into<String>) -> Self {
        MapperError::InvalidSpec {
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }
}

fn for_field(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" for field '{name}'"),
        None => String::new(),
    }
}

/// Convenience alias used throughout docmap.
pub type Result<T> = std::result::Result<T, MapperError>;
