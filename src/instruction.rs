//! Policy instructions and their field validation.
//!
//! One instruction describes a single registry operation: a key path, a
//! value name, a value type and the typed payload. The key and value
//! grammars are shared between the reader and the writer so neither
//! direction can produce a record the other rejects.

use crate::error::{PolicyError, Result};
use crate::types::PolicyRegType;
use crate::value::PolicyData;

/// Maximum length of a value name in UTF-16 code units.
pub const MAX_VALUE_NAME_LEN: usize = 259;

/// Returns true for characters the key and value grammars allow.
///
/// The class is printable ASCII, `[0x20, 0x7E]`.
pub(crate) fn is_value_character(c: char) -> bool {
    ('\x20'..='\x7E').contains(&c)
}

/// Validates a registry key path.
///
/// A key path is one or more segments separated by single backslashes;
/// every segment is a non-empty run of printable ASCII characters.
pub(crate) fn validate_key_path(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(PolicyError::invalid_key_path("key path is empty"));
    }

    for segment in key.split('\\') {
        if segment.is_empty() {
            return Err(PolicyError::invalid_key_path(format!(
                "empty segment in {:?}",
                key
            )));
        }
        if let Some(c) = segment.chars().find(|&c| !is_value_character(c)) {
            return Err(PolicyError::invalid_key_path(format!(
                "illegal character {:?} in {:?}",
                c, key
            )));
        }
    }

    Ok(())
}

/// Validates a registry value name.
///
/// Value names may be empty, are capped at [`MAX_VALUE_NAME_LEN`] code
/// units and consist of printable ASCII characters. `\` is permitted.
pub(crate) fn validate_value_name(value: &str) -> Result<()> {
    if value.chars().count() > MAX_VALUE_NAME_LEN {
        return Err(PolicyError::invalid_value_name(format!(
            "longer than {} code units",
            MAX_VALUE_NAME_LEN
        )));
    }
    if let Some(c) = value.chars().find(|&c| !is_value_character(c)) {
        return Err(PolicyError::invalid_value_name(format!(
            "illegal character {:?}",
            c
        )));
    }

    Ok(())
}

/// One registry policy instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyInstruction {
    /// Registry key path, segments joined with `\`.
    pub key: String,

    /// Value name under the key. May be empty.
    pub value: String,

    /// Registry value type.
    pub value_type: PolicyRegType,

    /// Typed payload. Its shape must match `value_type`.
    pub data: PolicyData,
}

impl PolicyInstruction {
    /// Constructs a validated instruction.
    ///
    /// # Errors
    ///
    /// Fails if the key path or value name violates the grammar, or if
    /// the payload shape does not belong to `value_type`.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        value_type: PolicyRegType,
        data: PolicyData,
    ) -> Result<Self> {
        let key = key.into();
        let value = value.into();

        validate_key_path(&key)?;
        validate_value_name(&value)?;
        if !data.matches_type(value_type) {
            return Err(PolicyError::DataTypeMismatch {
                value_type: value_type.name(),
            });
        }

        Ok(PolicyInstruction {
            key,
            value,
            value_type,
            data,
        })
    }

    /// Returns the segments of the key path in order.
    pub fn key_segments(&self) -> impl Iterator<Item = &str> {
        self.key.split('\\')
    }
}
