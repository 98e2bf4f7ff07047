//! # PReg (Registry.pol) Parser
//!
//! A parser and writer for the Windows Group Policy Registry Preferences
//! file format ("PReg", the on-disk format of `Registry.pol`), written in
//! Rust.
//!
//! ## Features
//!
//! - **Symmetric codec**: parse a byte stream into a policy model and
//!   write it back, reproducing well-formed input byte for byte
//! - **Complete type support**: all twelve registry value types legal in
//!   PReg, including both endiannesses of DWORD and QWORD payloads
//! - **Type-safe**: the value type tag and the payload shape are tied
//!   together in a single tagged union
//! - **Strict grammar**: character classes, length bounds, delimiter and
//!   framing checks are enforced on both read and write
//! - **Comprehensive error handling**: detailed error types for debugging
//!
//! ## Architecture
//!
//! The codec is built in three layers:
//!
//! 1. **Byte primitives** (`binary`): endianness-aware integer I/O and
//!    UTF-16LE ↔ UTF-8 string transcoding
//! 2. **Grammar engine** (`header`, `parser`): the file header and the
//!    bracketed instruction grammar
//! 3. **Data model** (`types`, `value`, `instruction`, `policy`): the
//!    typed document produced by parsing
//!
//! ## Binary Layout
//!
//! PReg files follow this structure:
//!
//! ```text
//! [Header - 8 bytes]
//!   - Signature: "PReg"
//!   - Version: 1 (u32, little-endian)
//!
//! [Instructions - variable size]
//!   [ keypath NUL ; valuename NUL ; type ; size ; data ]
//!     - All punctuation is one UTF-16LE code unit
//!     - keypath/valuename: UTF-16LE text
//!     - type, size: u32, little-endian
//!     - data: `size` bytes, interpreted per type
//! ```
//!
//! ## Examples
//!
//! ### Parsing
//!
//! ```no_run
//! use preg_parser::PregParser;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = PregParser::new();
//! let mut file = File::open("Registry.pol")?;
//! let policy = parser.parse(&mut file)?;
//!
//! for instruction in policy.instructions() {
//!     println!(
//!         "{} \\ {} ({}) = {}",
//!         instruction.key, instruction.value, instruction.value_type, instruction.data
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Building and writing a document
//!
//! ```
//! use preg_parser::{PolicyData, PolicyFile, PolicyInstruction, PolicyRegType, PregParser};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let instruction = PolicyInstruction::new(
//!     "Software\\Policies\\Example",
//!     "Enabled",
//!     PolicyRegType::DwordLittleEndian,
//!     PolicyData::Dword(1),
//! )?;
//!
//! let parser = PregParser::new();
//! let mut out = Vec::new();
//! parser.write(&mut out, &PolicyFile::with_instructions(vec![instruction]))?;
//! assert!(out.starts_with(b"PReg"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary;
pub mod error;
pub mod header;
pub mod instruction;
pub mod parser;
pub mod policy;
pub mod types;
pub mod value;

// Python bindings (only compiled when python feature is enabled)
#[cfg(feature = "python")]
pub mod python;

// Re-export main types for convenience
pub use error::{PolicyError, Result};
pub use header::{HEADER_SIZE, PREG_SIGNATURE, PREG_VERSION};
pub use instruction::{PolicyInstruction, MAX_VALUE_NAME_LEN};
pub use parser::PregParser;
pub use policy::{PolicyBody, PolicyFile};
pub use types::PolicyRegType;
pub use value::PolicyData;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
