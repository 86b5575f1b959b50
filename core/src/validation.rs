//! Todo text validation.
//!
//! A `TodoValue` can only be obtained through [`TodoValue::parse`], so any
//! function taking one may assume the length bounds already hold.

use crate::error::ValidationError;

pub const MIN_VALUE_CHARS: usize = 1;
pub const MAX_VALUE_CHARS: usize = 50;

/// Todo text between `MIN_VALUE_CHARS` and `MAX_VALUE_CHARS` characters.
///
/// Length is counted in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane (most emoji) counts twice. Surrounding
/// whitespace is kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoValue(String);

impl TodoValue {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let units = raw.encode_utf16().count();
        if units < MIN_VALUE_CHARS {
            return Err(ValidationError::ValueTooShort {
                min: MIN_VALUE_CHARS,
            });
        }
        if units > MAX_VALUE_CHARS {
            return Err(ValidationError::ValueTooLong {
                max: MAX_VALUE_CHARS,
                actual: units,
            });
        }
        Ok(Self(raw))
    }

    /// Validates a field that may be absent from the request entirely.
    pub fn parse_required(raw: Option<String>) -> Result<Self, ValidationError> {
        raw.ok_or(ValidationError::MissingValue).and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
