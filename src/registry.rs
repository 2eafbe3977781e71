//! The closed registry of scalar kinds.
//!
//! A [`TypeId`] carries a storage code that is written next to every persisted
//! value. These codes are permanent: the order below *cannot* be changed without
//! breaking existing data, so new kinds are only ever appended at the end and
//! nothing is removed even once it falls out of use.

// used to print out readable forms of a type identifier
use std::fmt;
// the name table is a plain hashmap, built once and only read afterwards
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;

use crate::datatype::{Date, Geo, Value};

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeId {
    Binary = 0,
    Int32 = 1,
    Float = 2,
    Bool = 3,
    DateTime = 4,
    String = 5,
    Date = 6,
    Geo = 7,
}

lazy_static! {
    // schema-facing names, note that "id" is an alias and not a kind of its own
    static ref TYPE_NAMES: HashMap<&'static str, TypeId> = HashMap::from([
        ("int", TypeId::Int32),
        ("float", TypeId::Float),
        ("string", TypeId::String),
        ("bool", TypeId::Bool),
        ("id", TypeId::String),
        ("datetime", TypeId::DateTime),
        ("date", TypeId::Date),
        ("geo", TypeId::Geo),
    ]);
}

impl TypeId {
    /// Every known kind, in storage code order.
    pub const ALL: [TypeId; 8] = [
        TypeId::Binary,
        TypeId::Int32,
        TypeId::Float,
        TypeId::Bool,
        TypeId::DateTime,
        TypeId::String,
        TypeId::Date,
        TypeId::Geo,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<TypeId> {
        TypeId::ALL.get(code as usize).copied()
    }

    /// The display name of the kind. This is not always the schema name
    /// (`DateTime` displays as "dateTime" but is declared as "datetime"), and
    /// neither `Binary` nor `Geo` has one, so those give an empty string even
    /// though "geo" resolves through [`type_for_name`].
    pub fn name(self) -> &'static str {
        match self {
            TypeId::Int32 => "int",
            TypeId::Float => "float",
            TypeId::Bool => "bool",
            TypeId::String => "string",
            TypeId::Date => "date",
            TypeId::DateTime => "dateTime",
            TypeId::Binary | TypeId::Geo => "",
        }
    }

    /// True for the two kinds that hold untyped text.
    pub fn is_textual(self) -> bool {
        matches!(self, TypeId::Binary | TypeId::String)
    }
}

// Diagnostics need a label even where `name` has none.
impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeId::Binary => write!(f, "binary"),
            TypeId::Geo => write!(f, "geo"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Looks up a schema name. The match is exact and case sensitive, so "INT"
/// or "integer" are simply not found.
pub fn type_for_name(name: &str) -> Option<TypeId> {
    TYPE_NAMES.get(name).copied()
}

/// A freshly built zero value of the given kind.
pub fn value_for_type(id: TypeId) -> Value {
    match id {
        TypeId::Binary => Value::Binary(Vec::new()),
        TypeId::Int32 => Value::Int32(0),
        TypeId::Float => Value::Float(0.0),
        TypeId::Bool => Value::Bool(false),
        TypeId::DateTime => Value::DateTime(DateTime::<Utc>::UNIX_EPOCH),
        TypeId::String => Value::String(String::new()),
        TypeId::Date => Value::Date(Date::default()),
        TypeId::Geo => Value::Geo(Geo::default()),
    }
}

/// Zero value for a storage code, or `None` when the code names no known kind.
/// An unknown code is not an error here, callers decide what it means.
pub fn value_for_code(code: u8) -> Option<Value> {
    TypeId::from_code(code).map(value_for_type)
}
