//! Error types for PReg codec operations.
//!
//! This module provides error handling for both directions of the codec:
//! parsing a byte stream into a policy document and writing a document
//! back out. Every grammar violation maps to a dedicated variant.

use std::io;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors that can occur while parsing or writing a PReg stream.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// I/O error from the underlying stream (short read, write failure).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic signature in the file header.
    #[error("Invalid signature: expected {expected:?}, found {found:?}")]
    InvalidSignature {
        /// Expected signature bytes ("PReg").
        expected: [u8; 4],
        /// Actual bytes found at the start of the stream.
        found: [u8; 4],
    },

    /// Signature matched but the version word is not 1.
    #[error("Unsupported PReg version: {version}")]
    UnsupportedVersion {
        /// The version word read from the header.
        version: u32,
    },

    /// Expected bracket or semicolon was not present.
    #[error("Expected '{expected}' at offset {offset:#x}, found code unit {found:#06x}")]
    UnexpectedDelimiter {
        /// The punctuation character the grammar requires here.
        expected: char,
        /// The UTF-16LE code unit actually read.
        found: u16,
        /// Byte offset of the offending code unit.
        offset: u64,
    },

    /// Empty key segment or illegal character in a key path.
    #[error("Invalid key path: {0}")]
    InvalidKeyPath(String),

    /// Value name too long or containing an illegal character.
    #[error("Invalid value name: {0}")]
    InvalidValueName(String),

    /// Type tag outside the range the PReg grammar allows (1..=12).
    #[error("Invalid value type: {0}")]
    InvalidValueType(u32),

    /// Declared data size inconsistent with the value type.
    #[error("Invalid data size {size} for {value_type}")]
    InvalidDataSize {
        /// Name of the value type whose width constraint was violated.
        value_type: &'static str,
        /// The declared size in bytes.
        size: u32,
    },

    /// Data payload shape does not match the instruction's value type.
    #[error("Data payload does not match value type {value_type}")]
    DataTypeMismatch {
        /// Name of the value type the payload was expected to match.
        value_type: &'static str,
    },

    /// Invalid UTF-16LE text data (odd length or malformed code units).
    #[error("Invalid UTF-16 data at offset {offset:#x}")]
    InvalidUtf16 {
        /// Byte offset of the text block.
        offset: u64,
    },

    /// A string block was not terminated with a trailing U+0000.
    #[error("Missing NUL terminator in string data at offset {offset:#x}")]
    MissingNulTerminator {
        /// Byte offset of the text block.
        offset: u64,
    },
}

impl PolicyError {
    /// Creates an invalid signature error with context.
    pub fn invalid_signature(expected: [u8; 4], found: [u8; 4]) -> Self {
        Self::InvalidSignature { expected, found }
    }

    /// Creates a delimiter mismatch error with context.
    pub fn unexpected_delimiter(expected: char, found: u16, offset: u64) -> Self {
        Self::UnexpectedDelimiter {
            expected,
            found,
            offset,
        }
    }

    /// Creates a key path error with a formatted reason.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use preg_parser::error::PolicyError;
    /// let err = PolicyError::invalid_key_path("empty segment at offset 0x10");
    /// ```
    pub fn invalid_key_path(reason: impl Into<String>) -> Self {
        Self::InvalidKeyPath(reason.into())
    }

    /// Creates a value name error with a formatted reason.
    pub fn invalid_value_name(reason: impl Into<String>) -> Self {
        Self::InvalidValueName(reason.into())
    }

    /// Creates a data size error for the named value type.
    pub fn invalid_data_size(value_type: &'static str, size: u32) -> Self {
        Self::InvalidDataSize { value_type, size }
    }

    /// Returns true if this error came from the underlying stream rather
    /// than from the PReg grammar.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
