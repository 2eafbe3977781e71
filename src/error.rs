use thiserror::Error;

use crate::registry::TypeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValtypeError {
    #[error("Cannot convert {value} to type {to}")]
    CannotConvert { value: String, to: TypeId },
    #[error("Unable to parse '{text}' as type {to}: {reason}")]
    Malformed { text: String, to: TypeId, reason: String },
    #[error("Value {value} is out of range for type {to}")]
    OutOfRange { value: String, to: TypeId },
    #[error("Invalid UTF-8 in bytes converted to type {to}")]
    InvalidUtf8 { to: TypeId },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ValtypeError>;

impl ValtypeError {
    pub(crate) fn malformed(text: &str, to: TypeId, reason: impl ToString) -> Self {
        Self::Malformed { text: text.to_string(), to, reason: reason.to_string() }
    }
    /// True for the "no conversion is defined for this pair" condition.
    pub fn is_cannot_convert(&self) -> bool {
        matches!(self, Self::CannotConvert { .. })
    }
}

// Helper conversions
impl From<config::ConfigError> for ValtypeError {
    fn from(e: config::ConfigError) -> Self { Self::Settings(e.to_string()) }
}
