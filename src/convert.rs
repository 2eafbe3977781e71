//! Conversion between scalar kinds.
//!
//! Text is the universal intermediary: every kind can be turned into a string
//! or bytes, and a string or bytes can be parsed into every kind. Any other pair
//! converts only when the target kind declares it accepts the source kind, by
//! implementing one of the `Accepts*` capability traits below. A new kind added
//! to [`Value`] has to be handled in [`convert`] before the crate compiles, but
//! unless it also implements or is accepted through a capability it only
//! converts to and from text.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::datatype::{has_text_form, Date, Value};
use crate::error::{ValtypeError, Result};
use crate::registry::{value_for_type, TypeId};

pub trait AcceptsInt {
    fn accept_int(&mut self, value: i32) -> Result<()>;
}

pub trait AcceptsFloat {
    fn accept_float(&mut self, value: f64) -> Result<()>;
}

pub trait AcceptsBool {
    fn accept_bool(&mut self, value: bool) -> Result<()>;
}

pub trait AcceptsTimestamp {
    fn accept_timestamp(&mut self, value: DateTime<Utc>) -> Result<()>;
}

pub trait AcceptsDate {
    fn accept_date(&mut self, value: Date) -> Result<()>;
}

/// Converts `value` into a new value of kind `to`. The source is never
/// modified, and on error no partial value is produced.
pub fn convert(value: &Value, to: TypeId) -> Result<Value> {
    let from = value.type_id();
    if from == to {
        return Ok(value.clone());
    }

    if to.is_textual() {
        trace!(%from, %to, "converting through text");
        let text = value.marshal_text().inspect_err(|e| debug!(%from, %to, error = %e, "marshal failed"))?;
        return Ok(match to {
            TypeId::Binary => Value::Binary(text.into_bytes()),
            _ => Value::String(text),
        });
    }

    let mut target = value_for_type(to);
    match value {
        // bytes denote an untyped value, which is almost always a string
        Value::Binary(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| ValtypeError::InvalidUtf8 { to })?;
            unmarshal(&mut target, text)?;
        }
        Value::String(text) => unmarshal(&mut target, text)?,
        Value::Int32(v) => int_acceptor(&mut target)
            .ok_or_else(|| cannot_convert(value, to))?
            .accept_int(*v)?,
        Value::Float(v) => float_acceptor(&mut target)
            .ok_or_else(|| cannot_convert(value, to))?
            .accept_float(*v)?,
        Value::Bool(v) => bool_acceptor(&mut target)
            .ok_or_else(|| cannot_convert(value, to))?
            .accept_bool(*v)?,
        Value::DateTime(v) => timestamp_acceptor(&mut target)
            .ok_or_else(|| cannot_convert(value, to))?
            .accept_timestamp(*v)?,
        Value::Date(v) => date_acceptor(&mut target)
            .ok_or_else(|| cannot_convert(value, to))?
            .accept_date(*v)?,
        Value::Geo(_) => return Err(cannot_convert(value, to)),
    }
    Ok(target)
}

fn unmarshal(target: &mut Value, text: &str) -> Result<()> {
    target
        .unmarshal_text(text)
        .inspect_err(|e| debug!(to = %target.type_id(), error = %e, "malformed text"))
}

fn cannot_convert(value: &Value, to: TypeId) -> ValtypeError {
    debug!(from = %value.type_id(), %to, "no conversion defined");
    ValtypeError::CannotConvert { value: value.to_string(), to }
}

fn out_of_range(value: impl ToString, to: TypeId) -> ValtypeError {
    ValtypeError::OutOfRange { value: value.to_string(), to }
}

// ------------- Capability lookup --------------
// Each target kind lists the capabilities it implements, everything else is None.

fn int_acceptor(target: &mut Value) -> Option<&mut dyn AcceptsInt> {
    match target {
        Value::Float(v) => Some(v),
        Value::Bool(v) => Some(v),
        Value::DateTime(v) => Some(v),
        _ => None,
    }
}

fn float_acceptor(target: &mut Value) -> Option<&mut dyn AcceptsFloat> {
    match target {
        Value::Int32(v) => Some(v),
        Value::Bool(v) => Some(v),
        Value::DateTime(v) => Some(v),
        _ => None,
    }
}

fn bool_acceptor(target: &mut Value) -> Option<&mut dyn AcceptsBool> {
    match target {
        Value::Int32(v) => Some(v),
        Value::Float(v) => Some(v),
        _ => None,
    }
}

fn timestamp_acceptor(target: &mut Value) -> Option<&mut dyn AcceptsTimestamp> {
    match target {
        Value::Int32(v) => Some(v),
        Value::Float(v) => Some(v),
        Value::Date(v) => Some(v),
        _ => None,
    }
}

fn date_acceptor(target: &mut Value) -> Option<&mut dyn AcceptsDate> {
    match target {
        Value::Int32(v) => Some(v),
        Value::Float(v) => Some(v),
        Value::DateTime(v) => Some(v),
        _ => None,
    }
}

// ------------- Int32 --------------
impl AcceptsFloat for i32 {
    // truncates toward zero
    fn accept_float(&mut self, value: f64) -> Result<()> {
        let truncated = value.trunc();
        if !truncated.is_finite() || truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
            return Err(out_of_range(value, TypeId::Int32));
        }
        *self = truncated as i32;
        Ok(())
    }
}
impl AcceptsBool for i32 {
    fn accept_bool(&mut self, value: bool) -> Result<()> {
        *self = i32::from(value);
        Ok(())
    }
}
impl AcceptsTimestamp for i32 {
    fn accept_timestamp(&mut self, value: DateTime<Utc>) -> Result<()> {
        *self = i32::try_from(value.timestamp()).map_err(|_| out_of_range(value.to_rfc3339(), TypeId::Int32))?;
        Ok(())
    }
}
impl AcceptsDate for i32 {
    fn accept_date(&mut self, value: Date) -> Result<()> {
        self.accept_timestamp(value.to_datetime())
    }
}

// ------------- Float --------------
impl AcceptsInt for f64 {
    fn accept_int(&mut self, value: i32) -> Result<()> {
        *self = f64::from(value);
        Ok(())
    }
}
impl AcceptsBool for f64 {
    fn accept_bool(&mut self, value: bool) -> Result<()> {
        *self = if value { 1.0 } else { 0.0 };
        Ok(())
    }
}
impl AcceptsTimestamp for f64 {
    fn accept_timestamp(&mut self, value: DateTime<Utc>) -> Result<()> {
        *self = value.timestamp() as f64 + f64::from(value.timestamp_subsec_nanos()) / 1e9;
        Ok(())
    }
}
impl AcceptsDate for f64 {
    fn accept_date(&mut self, value: Date) -> Result<()> {
        self.accept_timestamp(value.to_datetime())
    }
}

// ------------- Bool --------------
impl AcceptsInt for bool {
    fn accept_int(&mut self, value: i32) -> Result<()> {
        *self = value != 0;
        Ok(())
    }
}
impl AcceptsFloat for bool {
    fn accept_float(&mut self, value: f64) -> Result<()> {
        *self = value != 0.0;
        Ok(())
    }
}

// ------------- DateTime --------------
// Numbers are seconds since the Unix epoch. Only years with a textual form
// are accepted.
fn timestamp_from(seconds: i64, nanos: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, nanos).filter(has_text_form)
}

impl AcceptsInt for DateTime<Utc> {
    fn accept_int(&mut self, value: i32) -> Result<()> {
        *self = timestamp_from(i64::from(value), 0).ok_or_else(|| out_of_range(value, TypeId::DateTime))?;
        Ok(())
    }
}
impl AcceptsFloat for DateTime<Utc> {
    fn accept_float(&mut self, value: f64) -> Result<()> {
        let mut seconds = value.floor();
        if !seconds.is_finite() || seconds < i64::MIN as f64 || seconds >= i64::MAX as f64 {
            return Err(out_of_range(value, TypeId::DateTime));
        }
        let mut nanos = ((value - seconds) * 1e9).round() as u32;
        if nanos >= 1_000_000_000 {
            seconds += 1.0;
            nanos = 0;
        }
        *self = timestamp_from(seconds as i64, nanos).ok_or_else(|| out_of_range(value, TypeId::DateTime))?;
        Ok(())
    }
}
impl AcceptsDate for DateTime<Utc> {
    fn accept_date(&mut self, value: Date) -> Result<()> {
        *self = value.to_datetime();
        Ok(())
    }
}

// ------------- Date --------------
impl AcceptsTimestamp for Date {
    fn accept_timestamp(&mut self, value: DateTime<Utc>) -> Result<()> {
        *self = Date::from_datetime(value).ok_or_else(|| out_of_range(format!("{:?}", value), TypeId::Date))?;
        Ok(())
    }
}
