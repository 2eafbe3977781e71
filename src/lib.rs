//! Valtype – scalar types and the conversions between them.
//!
//! Every stored scalar carries a type tag. This crate defines those tags, the
//! one in-memory representation behind each of them, and how a value of one
//! kind becomes a value of another:
//! * A [`registry::TypeId`] names a scalar kind and owns a permanent storage code.
//! * A [`datatype::Value`] is a scalar, its variant doubling as its tag.
//! * [`convert::convert`] turns a value into another kind, going through the
//!   canonical textual form or through a capability the target kind declares.
//!
//! ## Modules
//! * [`registry`] – Type identifiers, schema names and zero values.
//! * [`datatype`] – The [`datatype::DataType`] trait with the textual grammar of
//!   each kind, plus the special `Date` and `Geo` representations.
//! * [`convert`] – The conversion dispatcher and the `Accepts*` capabilities.
//! * [`settings`] – Settings file and logging setup for embedding applications.
//! * [`error`] – The [`error::ValtypeError`] type.
//!
//! ## Kinds
//! | Kind | Code | Schema name | Representation |
//! |------|------|-------------|----------------|
//! | Binary | 0 | | `Vec<u8>` |
//! | Int32 | 1 | `int` | `i32` |
//! | Float | 2 | `float` | `f64` |
//! | Bool | 3 | `bool` | `bool` |
//! | DateTime | 4 | `datetime` | `DateTime<Utc>` |
//! | String | 5 | `string`, `id` | `String` |
//! | Date | 6 | `date` | [`datatype::Date`] |
//! | Geo | 7 | `geo` | [`datatype::Geo`] |
//!
//! Storage codes are persisted along with values, so new kinds are appended
//! and existing codes never change.
//!
//! ## Quick Start
//! ```
//! use valtype::{convert, type_for_name, TypeId, Value};
//! let to = type_for_name("float").unwrap();
//! assert_eq!(convert(&Value::from("3.14"), to).unwrap(), Value::Float(3.14));
//! assert_eq!(convert(&Value::Int32(42), TypeId::String).unwrap(), Value::from("42"));
//! assert!(convert(&Value::Bool(true), TypeId::Geo).unwrap_err().is_cannot_convert());
//! ```
//!
//! ## Adding a kind
//! Append a variant to [`registry::TypeId`] and [`datatype::Value`], implement
//! [`datatype::DataType`] for its representation and handle it in
//! [`convert::convert`]. Without `Accepts*` implementations the new kind only
//! converts to and from text.

pub mod convert;
pub mod datatype;
pub mod error;
pub mod registry;
pub mod settings;

pub use convert::convert;
pub use datatype::{Date, Geo, Geometry, Value};
pub use error::{ValtypeError, Result};
pub use registry::{type_for_name, value_for_code, value_for_type, TypeId};
