//! Numeric payload of [`Value::Number`](crate::Value::Number).

use std::fmt;

/// A finite number that keeps integers exact and falls back to `f64` for
/// fractional values.
///
/// Integers are stored as `u64` when non-negative and `i64` otherwise, so every
/// Rust integer primitive round-trips without loss. Equality is numeric:
/// `Number::from(1)` equals `Number::from_f64(1.0)`.
#[derive(Clone, Copy)]
pub struct Number(N);

#[derive(Clone, Copy, Debug)]
enum N {
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
    /// Always finite.
    Float(f64),
}

impl Number {
    /// Wrap a float. Returns `None` for NaN and infinities.
    pub fn from_f64(f: f64) -> Option<Number> {
        f.is_finite().then_some(Number(N::Float(f)))
    }

    /// True when the number holds an integer representation.
    pub fn is_integer(&self) -> bool {
        !matches!(self.0, N::Float(_))
    }

    pub fn is_f64(&self) -> bool {
        matches!(self.0, N::Float(_))
    }

    /// The value as `i64` when it is an integer inside `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    /// The value as `u64` when it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(u) => Some(u),
            _ => None,
        }
    }

    /// The value as `f64`. Large integers may lose precision.
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    /// The value as a whole number, accepting floats without a fractional part.
    ///
    /// Used when narrowing into integer targets: `2.0` is accepted, `2.5` is not.
    pub fn as_integral(&self) -> Option<i128> {
        match self.0 {
            N::PosInt(u) => Some(i128::from(u)),
            N::NegInt(i) => Some(i128::from(i)),
            N::Float(f) if f.fract() == 0.0 && f.abs() < 1.7e38 => Some(f as i128),
            N::Float(_) => None,
        }
    }

    /// Parse decimal text: integers first, then floating point.
    ///
    /// Returns `None` for text that is not a number or parses to a non-finite
    /// float.
    pub fn parse(text: &str) -> Option<Number> {
        if let Ok(u) = text.parse::<u64>() {
            return Some(Number(N::PosInt(u)));
        }
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::from(i));
        }
        text.parse::<f64>().ok().and_then(Number::from_f64)
    }

    fn exact(&self) -> Option<i128> {
        match self.0 {
            N::PosInt(u) => Some(i128::from(u)),
            N::NegInt(i) => Some(i128::from(i)),
            N::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.exact(), other.exact()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            N::PosInt(u) => write!(f, "{u}"),
            N::NegInt(i) => write!(f, "{i}"),
            N::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(u: $t) -> Self {
                Number(N::PosInt(u as u64))
            }
        })*
    };
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(i: $t) -> Self {
                let i = i as i64;
                if i < 0 {
                    Number(N::NegInt(i))
                } else {
                    Number(N::PosInt(i as u64))
                }
            }
        })*
    };
}

from_unsigned!(u8, u16, u32, u64, usize);
from_signed!(i8, i16, i32, i64, isize);

mod serde_impl {
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Number, N};

    impl Serialize for Number {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0 {
                N::PosInt(u) => serializer.serialize_u64(u),
                N::NegInt(i) => serializer.serialize_i64(i),
                N::Float(f) => serializer.serialize_f64(f),
            }
        }
    }

    impl<'de> Deserialize<'de> for Number {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct NumberVisitor;

            impl Visitor<'_> for NumberVisitor {
                type Value = Number;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str("a finite number")
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
                    Ok(Number::from(v))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
                    Ok(Number::from(v))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
                    Number::from_f64(v).ok_or_else(|| E::custom("non-finite number"))
                }
            }

            deserializer.deserialize_any(NumberVisitor)
        }
    }
}
