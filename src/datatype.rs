// used for timestamps and dates
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
// used for the geo kind, whose textual form is GeoJSON
use serde::{Deserialize, Serialize};
// used when matching partial dates such as '2016' or '2016-03'
use regex::Regex;
use lazy_static::lazy_static;

// used to print out readable forms of a value
use std::fmt;
// used to order values of the same kind
use std::cmp::Ordering;

use crate::error::{ValtypeError, Result};
use crate::registry::TypeId;

lazy_static! {
    static ref PARTIAL_DATE: Regex = Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").unwrap();
}

/// A scalar representation with a canonical, round-trippable textual form.
///
/// Marshalling never fails for a valid value of a kind with a textual grammar.
/// Unmarshalling overwrites `self`, which is expected to be a zero value built
/// by [`crate::registry::value_for_type`], and leaves it untouched on error.
pub trait DataType: fmt::Debug + Clone + Send + Sync {
    // static stuff which needs to be implemented downstream
    const TYPE_ID: TypeId;
    fn marshal_text(&self) -> Result<String>;
    fn unmarshal_text(&mut self, text: &str) -> Result<()>;
    // instance callable with pre-made implementation
    fn type_id(&self) -> TypeId {
        Self::TYPE_ID
    }
}

// ------------- Data Types --------------
impl DataType for Vec<u8> {
    const TYPE_ID: TypeId = TypeId::Binary;
    fn marshal_text(&self) -> Result<String> {
        String::from_utf8(self.clone()).map_err(|_| ValtypeError::InvalidUtf8 { to: TypeId::String })
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = text.as_bytes().to_vec();
        Ok(())
    }
}
impl DataType for i32 {
    const TYPE_ID: TypeId = TypeId::Int32;
    fn marshal_text(&self) -> Result<String> {
        Ok(self.to_string())
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = text
            .parse::<i32>()
            .map_err(|e| ValtypeError::malformed(text, Self::TYPE_ID, e))?;
        Ok(())
    }
}
impl DataType for f64 {
    const TYPE_ID: TypeId = TypeId::Float;
    // very large and very small magnitudes switch to exponent form
    fn marshal_text(&self) -> Result<String> {
        let magnitude = self.abs();
        if self.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
            Ok(format!("{:e}", self))
        } else {
            Ok(self.to_string())
        }
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = text
            .parse::<f64>()
            .map_err(|e| ValtypeError::malformed(text, Self::TYPE_ID, e))?;
        Ok(())
    }
}
impl DataType for bool {
    const TYPE_ID: TypeId = TypeId::Bool;
    fn marshal_text(&self) -> Result<String> {
        Ok(self.to_string())
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = match text {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
            "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
            _ => return Err(ValtypeError::malformed(text, Self::TYPE_ID, "not a boolean literal")),
        };
        Ok(())
    }
}
impl DataType for DateTime<Utc> {
    const TYPE_ID: TypeId = TypeId::DateTime;
    fn marshal_text(&self) -> Result<String> {
        if !has_text_form(self) {
            return Err(ValtypeError::OutOfRange { value: format!("{:?}", self), to: TypeId::String });
        }
        Ok(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = parse_datetime(text)
            .ok_or_else(|| ValtypeError::malformed(text, Self::TYPE_ID, "not an RFC 3339 timestamp or date"))?;
        Ok(())
    }
}
impl DataType for String {
    const TYPE_ID: TypeId = TypeId::String;
    fn marshal_text(&self) -> Result<String> {
        Ok(self.clone())
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        *self = String::from(text);
        Ok(())
    }
}
impl DataType for Date {
    const TYPE_ID: TypeId = TypeId::Date;
    fn marshal_text(&self) -> Result<String> {
        Ok(self.0.format("%Y-%m-%d").to_string())
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        let date = parse_date(text)
            .ok_or_else(|| ValtypeError::malformed(text, Self::TYPE_ID, "expected YYYY, YYYY-MM or YYYY-MM-DD"))?;
        *self = Date::from_naive(date)
            .ok_or_else(|| ValtypeError::malformed(text, Self::TYPE_ID, "year out of range"))?;
        Ok(())
    }
}
impl DataType for Geo {
    const TYPE_ID: TypeId = TypeId::Geo;
    fn marshal_text(&self) -> Result<String> {
        serde_json::to_string(&self.0).map_err(|e| ValtypeError::InvalidGeometry(e.to_string()))
    }
    fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        let geometry: Geometry =
            serde_json::from_str(text).map_err(|e| ValtypeError::malformed(text, Self::TYPE_ID, e))?;
        geometry
            .validate()
            .map_err(|reason| ValtypeError::malformed(text, Self::TYPE_ID, reason))?;
        *self = Geo(geometry);
        Ok(())
    }
}

// A partial date resolves to its first day, so '2016' is 2016-01-01.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let captures = PARTIAL_DATE.captures(text)?;
    let year = captures.get(1)?.as_str().parse::<i32>().ok()?;
    let month = match captures.get(2) {
        Some(m) => m.as_str().parse::<u32>().ok()?,
        None => 1,
    };
    let day = match captures.get(3) {
        Some(d) => d.as_str().parse::<u32>().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

// Timestamps without an offset are taken to be UTC.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let parsed = if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else {
        Date::from_naive(parse_date(text)?)?.to_datetime()
    };
    has_text_form(&parsed).then_some(parsed)
}

/// Years that the four digit textual forms can hold.
pub const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// True when the timestamp's year can be written and read back as text.
pub fn has_text_form(dt: &DateTime<Utc>) -> bool {
    YEARS.contains(&dt.year())
}

// Special types below

/// A calendar date, held as a timestamp normalized to midnight UTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(DateTime<Utc>);

impl Date {
    // Constructors give None for years outside YEARS.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Date> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Date::from_naive)
    }
    pub fn from_naive(date: NaiveDate) -> Option<Date> {
        YEARS
            .contains(&date.year())
            .then(|| Date(date.and_time(chrono::NaiveTime::MIN).and_utc()))
    }
    /// Drops the time of day.
    pub fn from_datetime(dt: DateTime<Utc>) -> Option<Date> {
        Date::from_naive(dt.date_naive())
    }
    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0
    }
    pub fn naive(&self) -> NaiveDate {
        self.0.date_naive()
    }
}
impl Default for Date {
    fn default() -> Self {
        Date(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// A 2D position, longitude first as in GeoJSON.
pub type Position = [f64; 2];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Checks the shape rules GeoJSON puts on lines and rings, and that every
    /// coordinate is finite.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Geometry::Point { coordinates } => validate_positions(std::slice::from_ref(coordinates)),
            Geometry::MultiPoint { coordinates } => validate_positions(coordinates),
            Geometry::LineString { coordinates } => validate_line(coordinates),
            Geometry::MultiLineString { coordinates } => coordinates.iter().try_for_each(|l| validate_line(l)),
            Geometry::Polygon { coordinates } => validate_polygon(coordinates),
            Geometry::MultiPolygon { coordinates } => coordinates.iter().try_for_each(|p| validate_polygon(p)),
            Geometry::GeometryCollection { geometries } => geometries.iter().try_for_each(Geometry::validate),
        }
    }
}

fn validate_positions(positions: &[Position]) -> std::result::Result<(), String> {
    match positions.iter().flatten().find(|c| !c.is_finite()) {
        Some(c) => Err(format!("coordinate {} is not finite", c)),
        None => Ok(()),
    }
}

fn validate_line(line: &[Position]) -> std::result::Result<(), String> {
    if line.len() < 2 {
        return Err(format!("a line needs at least 2 positions, got {}", line.len()));
    }
    validate_positions(line)
}

fn validate_polygon(rings: &[Vec<Position>]) -> std::result::Result<(), String> {
    for ring in rings {
        if ring.len() < 4 {
            return Err(format!("a linear ring needs at least 4 positions, got {}", ring.len()));
        }
        if ring.first() != ring.last() {
            return Err(String::from("a linear ring must be closed"));
        }
        validate_positions(ring)?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geo(Geometry);

impl Geo {
    /// Wraps a geometry once it passes [`Geometry::validate`], so every Geo
    /// value has a GeoJSON form that reads back.
    pub fn new(geometry: Geometry) -> Result<Geo> {
        geometry.validate().map_err(ValtypeError::InvalidGeometry)?;
        Ok(Geo(geometry))
    }
    pub fn geometry(&self) -> &Geometry {
        &self.0
    }
}
// the zero geometry is an empty collection
impl Default for Geo {
    fn default() -> Self {
        Geo(Geometry::GeometryCollection { geometries: Vec::new() })
    }
}

/// A scalar value. The variant is the type tag, so every value knows its
/// [`TypeId`] and has exactly one in-memory representation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Binary(Vec<u8>),
    Int32(i32),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    String(String),
    Date(Date),
    Geo(Geo),
}

impl Value {
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Binary(v) => v.type_id(),
            Value::Int32(v) => v.type_id(),
            Value::Float(v) => v.type_id(),
            Value::Bool(v) => v.type_id(),
            Value::DateTime(v) => v.type_id(),
            Value::String(v) => v.type_id(),
            Value::Date(v) => v.type_id(),
            Value::Geo(v) => v.type_id(),
        }
    }
    pub fn marshal_text(&self) -> Result<String> {
        match self {
            Value::Binary(v) => v.marshal_text(),
            Value::Int32(v) => v.marshal_text(),
            Value::Float(v) => v.marshal_text(),
            Value::Bool(v) => v.marshal_text(),
            Value::DateTime(v) => v.marshal_text(),
            Value::String(v) => v.marshal_text(),
            Value::Date(v) => v.marshal_text(),
            Value::Geo(v) => v.marshal_text(),
        }
    }
    pub fn unmarshal_text(&mut self, text: &str) -> Result<()> {
        match self {
            Value::Binary(v) => v.unmarshal_text(text),
            Value::Int32(v) => v.unmarshal_text(text),
            Value::Float(v) => v.unmarshal_text(text),
            Value::Bool(v) => v.unmarshal_text(text),
            Value::DateTime(v) => v.unmarshal_text(text),
            Value::String(v) => v.unmarshal_text(text),
            Value::Date(v) => v.unmarshal_text(text),
            Value::Geo(v) => v.unmarshal_text(text),
        }
    }
    /// Orders two values of the same kind. Values of different kinds, and
    /// distinct geometries, are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Binary(a), Value::Binary(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Geo(a), Value::Geo(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Binary(v) => write!(f, "{}", String::from_utf8_lossy(v)),
            other => match other.marshal_text() {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "{:?}", other),
            },
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Value {
        Value::Binary(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int32(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Value {
        Value::DateTime(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(String::from(v))
    }
}
impl From<Date> for Value {
    fn from(v: Date) -> Value {
        Value::Date(v)
    }
}
impl From<Geo> for Value {
    fn from(v: Geo) -> Value {
        Value::Geo(v)
    }
}
