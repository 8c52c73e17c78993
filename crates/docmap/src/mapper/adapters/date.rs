//! Date/time values ↔ formatted strings or epoch numbers.

use std::any::Any;
use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{MapperError, Result};
use crate::mapper::adapter::TypeAdapter;
use crate::mapper::context::MapperContext;
use crate::mapper::types::{Native, TypeRef};
use crate::number::Number;
use crate::value::Value;

/// Per-field date rendering options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateFormat {
    /// strftime pattern; the mapper's date format when unset.
    pub pattern: Option<String>,
    /// Zone used to render and parse zoned values. UTC when unset.
    pub timezone: Option<Tz>,
    /// Render as a Number of seconds since the Unix epoch.
    pub epoch: bool,
    /// With `epoch`, count milliseconds instead of seconds.
    pub millis: bool,
}

impl DateFormat {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        DateFormat {
            pattern: Some(pattern.into()),
            ..DateFormat::default()
        }
    }

    pub fn epoch_seconds() -> Self {
        DateFormat {
            epoch: true,
            ..DateFormat::default()
        }
    }

    pub fn epoch_millis() -> Self {
        DateFormat {
            epoch: true,
            millis: true,
            ..DateFormat::default()
        }
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Check that the pattern, if any, is one chrono understands.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::InvalidDateFormat`] naming the pattern.
    pub fn validate(&self) -> Result<()> {
        match &self.pattern {
            Some(pattern) => validate_pattern(pattern),
            None => Ok(()),
        }
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(MapperError::InvalidDateFormat(pattern.to_string()));
    }
    Ok(())
}

/// `DateTime<Utc>`, `NaiveDateTime` and `NaiveDate`.
///
/// Zoned values render in the field's timezone; naive values render as-is.
/// On the way in a pattern with an offset is honoured, otherwise the text is
/// read as local time in the field's timezone, falling back to a bare date at
/// midnight.
pub struct DateAdapter;

enum Moment {
    Zoned(DateTime<Utc>),
    Naive(NaiveDateTime),
}

impl Moment {
    fn of(value: &dyn Any) -> Option<Moment> {
        if let Some(dt) = value.downcast_ref::<DateTime<Utc>>() {
            return Some(Moment::Zoned(*dt));
        }
        if let Some(dt) = value.downcast_ref::<NaiveDateTime>() {
            return Some(Moment::Naive(*dt));
        }
        value
            .downcast_ref::<NaiveDate>()
            .map(|d| Moment::Naive(d.and_time(NaiveTime::MIN)))
    }

    fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Moment::Zoned(dt) => *dt,
            Moment::Naive(dt) => dt.and_utc(),
        }
    }
}

enum Parsed {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

fn parse(text: &str, pattern: &str) -> Option<Parsed> {
    if let Ok(dt) = DateTime::parse_from_str(text, pattern) {
        return Some(Parsed::Zoned(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Some(Parsed::Local(dt));
    }
    NaiveDate::parse_from_str(text, pattern)
        .ok()
        .map(|d| Parsed::Local(d.and_time(NaiveTime::MIN)))
}

impl TypeAdapter for DateAdapter {
    fn to_tree(&self, ctx: &MapperContext<'_>, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        let moment = Moment::of(value).ok_or_else(|| MapperError::downcast(ty.name()))?;
        let format = ctx.date_format();

        if let Some(format) = format.filter(|f| f.epoch) {
            let utc = moment.to_utc();
            let n = if format.millis {
                utc.timestamp_millis()
            } else {
                utc.timestamp()
            };
            return Ok(Value::Number(Number::from(n)));
        }

        let pattern = format
            .and_then(|f| f.pattern.as_deref())
            .unwrap_or(ctx.mapper().config().date_format.as_str());
        let tz = format.and_then(|f| f.timezone).unwrap_or(Tz::UTC);

        let mut out = String::new();
        let rendered = match moment {
            Moment::Zoned(dt) => write!(out, "{}", dt.with_timezone(&tz).format(pattern)),
            Moment::Naive(dt) => write!(out, "{}", dt.format(pattern)),
        };
        rendered.map_err(|_| MapperError::InvalidDateFormat(pattern.to_string()))?;
        Ok(Value::String(out))
    }

    fn from_tree(&self, ctx: &MapperContext<'_>, value: &Value, ty: TypeRef) -> Result<Native> {
        let strict = ctx.mapper().is_strict();
        let format = ctx.date_format();
        let field = ctx.field_name();

        if let Some(format) = format.filter(|f| f.epoch) {
            let unit = if format.millis { "epoch millis" } else { "epoch seconds" };
            let n = value
                .as_number(strict)
                .ok()
                .and_then(|n| n.as_integral())
                .and_then(|n| i64::try_from(n).ok())
                .ok_or_else(|| MapperError::wrong_type(field, unit, value))?;
            let utc = if format.millis {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            };
            let utc = utc.ok_or_else(|| MapperError::DateParse {
                input: n.to_string(),
                pattern: unit.to_string(),
                field: field.map(str::to_string),
            })?;
            return into_native(ty, Parsed::Zoned(utc.fixed_offset()), Tz::UTC)
                .ok_or_else(|| MapperError::unmappable(ty.name()));
        }

        let pattern = format
            .and_then(|f| f.pattern.as_deref())
            .unwrap_or(ctx.mapper().config().date_format.as_str());
        let tz = format.and_then(|f| f.timezone).unwrap_or(Tz::UTC);
        let text = value
            .as_string(strict)
            .map_err(|_| MapperError::wrong_type(field, "string", value))?;
        let parse_error = || MapperError::DateParse {
            input: text.to_string(),
            pattern: pattern.to_string(),
            field: field.map(str::to_string),
        };

        validate_pattern(pattern)?;
        let parsed = parse(&text, pattern).ok_or_else(parse_error)?;
        into_native(ty, parsed, tz).ok_or_else(parse_error)
    }

    fn supported_types(&self) -> Vec<TypeRef> {
        vec![
            TypeRef::of::<DateTime<Utc>>(),
            TypeRef::of::<NaiveDateTime>(),
            TypeRef::of::<NaiveDate>(),
        ]
    }
}

/// Convert a parsed moment into the requested native type. `None` when the
/// local time does not exist in `tz` or `ty` is not a supported date type.
fn into_native(ty: TypeRef, parsed: Parsed, tz: Tz) -> Option<Native> {
    if ty.is::<DateTime<Utc>>() {
        let utc = match parsed {
            Parsed::Zoned(dt) => dt.with_timezone(&Utc),
            Parsed::Local(local) => tz.from_local_datetime(&local).earliest()?.with_timezone(&Utc),
        };
        return Some(Box::new(utc));
    }
    let local = match parsed {
        Parsed::Zoned(dt) => dt.naive_local(),
        Parsed::Local(local) => local,
    };
    if ty.is::<NaiveDateTime>() {
        return Some(Box::new(local));
    }
    if ty.is::<NaiveDate>() {
        return Some(Box::new(local.date()));
    }
    None
}
