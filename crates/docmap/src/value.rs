//! The value tree: a JSON-shaped document model with kind-aware coercion.
//!
//! Every typed accessor takes a `strict` flag. In strict mode only an exact
//! kind match succeeds. In lenient mode primitives narrow across kinds by a
//! fixed table:
//!
//! | from    | to      | rule                                                   |
//! |---------|---------|--------------------------------------------------------|
//! | Boolean | String  | `"true"` / `"false"`                                   |
//! | Number  | String  | locale-free rendering                                  |
//! | Boolean | Number  | `true → 1`, `false → 0`                                |
//! | String  | Number  | parse, failure is an error                             |
//! | String  | Boolean | `1 true yes y` → true, `0 false no n` → false          |
//! | Number  | Boolean | `0 → false`, `1 → true`, anything else is an error     |
//!
//! Every other pair fails with [`CoercingError`].

use std::borrow::Cow;
use std::fmt;

use crate::array::Array;
use crate::error::CoercingError;
use crate::number::Number;
use crate::object::Object;
use crate::path::Path;

/// The tag identifying a [`Value`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Boolean, Number and String are primitives.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Kind::Boolean | Kind::Number | Kind::String)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the value tree.
///
/// Absence is always `Null`; containers never hold anything else to mean
/// "missing". `clone` is a deep copy.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_primitive(&self) -> bool {
        self.kind().is_primitive()
    }

    /// Read the value as a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`CoercingError`] when strict and the value is not a Boolean,
    /// or when lenient and no rule accepts the value.
    pub fn as_boolean(&self, strict: bool) -> Result<bool, CoercingError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ if strict => Err(CoercingError::kind(Kind::Boolean, self)),
            Value::Number(n) => {
                let f = n.as_f64();
                if f == 0.0 {
                    Ok(false)
                } else if f == 1.0 {
                    Ok(true)
                } else {
                    Err(CoercingError::value(Kind::Boolean, self))
                }
            }
            Value::String(s) => match s.as_str() {
                "1" | "true" | "yes" | "y" => Ok(true),
                "0" | "false" | "no" | "n" => Ok(false),
                _ => Err(CoercingError::value(Kind::Boolean, self)),
            },
            _ => Err(CoercingError::kind(Kind::Boolean, self)),
        }
    }

    /// Read the value as a number.
    ///
    /// # Errors
    ///
    /// Returns [`CoercingError`] when strict and the value is not a Number,
    /// or when lenient and the value is not numeric text or a Boolean.
    pub fn as_number(&self, strict: bool) -> Result<Number, CoercingError> {
        match self {
            Value::Number(n) => Ok(*n),
            _ if strict => Err(CoercingError::kind(Kind::Number, self)),
            Value::Boolean(b) => Ok(Number::from(u8::from(*b))),
            Value::String(s) => {
                Number::parse(s).ok_or_else(|| CoercingError::value(Kind::Number, self))
            }
            _ => Err(CoercingError::kind(Kind::Number, self)),
        }
    }

    /// Read the value as text. Borrows when the value already is a String.
    ///
    /// # Errors
    ///
    /// Returns [`CoercingError`] when strict and the value is not a String, or
    /// when the value is Null or a container.
    pub fn as_string(&self, strict: bool) -> Result<Cow<'_, str>, CoercingError> {
        match self {
            Value::String(s) => Ok(Cow::Borrowed(s)),
            _ if strict => Err(CoercingError::kind(Kind::String, self)),
            Value::Boolean(b) => Ok(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Number(n) => Ok(Cow::Owned(n.to_string())),
            _ => Err(CoercingError::kind(Kind::String, self)),
        }
    }

    /// Borrow the value as an Array. No lenient rule produces an Array, so
    /// `strict` only matters for symmetry with the primitive accessors.
    pub fn as_array(&self, _strict: bool) -> Result<&Array, CoercingError> {
        match self {
            Value::Array(a) => Ok(a),
            _ => Err(CoercingError::kind(Kind::Array, self)),
        }
    }

    /// Borrow the value as an Object.
    pub fn as_object(&self, _strict: bool) -> Result<&Object, CoercingError> {
        match self {
            Value::Object(o) => Ok(o),
            _ => Err(CoercingError::kind(Kind::Object, self)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Array, CoercingError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(CoercingError::kind(Kind::Array, other)),
        }
    }

    pub fn as_object_mut(&mut self) -> Result<&mut Object, CoercingError> {
        match self {
            Value::Object(o) => Ok(o),
            other => Err(CoercingError::kind(Kind::Object, other)),
        }
    }

    /// Kind-and-value-aware equality.
    ///
    /// Strict requires the same kind and value. Lenient accepts two primitives
    /// when either coerces into the other's kind with a matching result.
    /// Arrays compare pairwise with equal length; objects compare by exact key
    /// set, ignoring key order. Strictness propagates into children.
    pub fn equals(&self, other: &Value, strict: bool) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a.equals(b, strict),
            (Value::Object(a), Value::Object(b)) => a.equals(b, strict),
            (a, b) if a.kind() == b.kind() => same_primitive(a, b),
            (a, b) if !strict && a.is_primitive() && b.is_primitive() => {
                coerce_into(a, b.kind()).is_some_and(|c| same_primitive(&c, b))
                    || coerce_into(b, a.kind()).is_some_and(|c| same_primitive(a, &c))
            }
            _ => false,
        }
    }

    /// Look up a direct child: object key, or array index given as decimal text.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(o) => o.get(key),
            Value::Array(a) => key.parse::<usize>().ok().and_then(|i| a.get(i)),
            _ => None,
        }
    }

    /// Walk a dotted path such as `"orders.0.id"`.
    ///
    /// Returns `None` when the path is malformed or any segment is missing.
    pub fn query(&self, path: &str) -> Option<&Value> {
        let path = Path::parse(path).ok()?;
        self.query_path(&path)
    }

    pub fn query_path(&self, path: &Path) -> Option<&Value> {
        path.parts()
            .iter()
            .try_fold(self, |node, part| node.get(part))
    }

    /// Like [`query`](Self::query), but Null and missing nodes yield `fallback`.
    pub fn query_or<'a>(&'a self, path: &str, fallback: &'a Value) -> &'a Value {
        match self.query(path) {
            Some(found) if !found.is_null() => found,
            _ => fallback,
        }
    }
}

fn same_primitive(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

fn coerce_into(value: &Value, kind: Kind) -> Option<Value> {
    match kind {
        Kind::Boolean => value.as_boolean(false).ok().map(Value::Boolean),
        Kind::Number => value.as_number(false).ok().map(Value::Number),
        Kind::String => value
            .as_string(false)
            .ok()
            .map(|s| Value::String(s.into_owned())),
        _ => None,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, true)
    }
}

/// Compact JSON rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::from(n))
            }
        })*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Non-finite floats become `Null`.
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::from(f64::from(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
