//! Typed instruction payloads.
//!
//! The on-wire type tag and the in-memory payload shape are kept in
//! lock-step through a single tagged union. Decoding and encoding both
//! match on every variant, so the type → payload table lives in exactly
//! one place per direction.

use crate::binary;
use crate::error::{PolicyError, Result};
use crate::types::PolicyRegType;
use byteorder::{BigEndian, LittleEndian};
use std::fmt;
use std::io::Cursor;

/// Parsed payload of a PReg instruction.
///
/// Endianness of numeric payloads is carried by [`PolicyRegType`], not by
/// the value; a `Dword` parsed from a big-endian tag holds the same host
/// integer a little-endian one would.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyData {
    /// Text payload (REG_SZ, REG_EXPAND_SZ, REG_LINK).
    String(String),

    /// Ordered text list payload (REG_MULTI_SZ and the resource types).
    MultiString(Vec<String>),

    /// Raw binary payload (REG_BINARY).
    Binary(Vec<u8>),

    /// 32-bit integer payload (REG_DWORD_*).
    Dword(u32),

    /// 64-bit integer payload (REG_QWORD_*).
    Qword(u64),
}

/// Checks the declared payload size against the type's width constraints.
///
/// DWORD and QWORD payloads have fixed widths; text and list payloads must
/// be even-sized and hold at least one NUL16; REG_BINARY takes any size.
pub(crate) fn check_data_size(value_type: PolicyRegType, size: u32) -> Result<()> {
    let ok = match value_type {
        PolicyRegType::DwordLittleEndian | PolicyRegType::DwordBigEndian => size == 4,
        PolicyRegType::QwordLittleEndian | PolicyRegType::QwordBigEndian => size == 8,
        PolicyRegType::Binary => true,
        _ => size >= 2 && size % 2 == 0,
    };

    if ok {
        Ok(())
    } else {
        Err(PolicyError::invalid_data_size(value_type.name(), size))
    }
}

impl PolicyData {
    /// Parses payload bytes according to the value type.
    ///
    /// `data` is the complete data field of one instruction; its length
    /// is checked against the type's width constraints. `offset` is the
    /// stream position of the field, used for error reporting.
    pub fn parse(data: &[u8], value_type: PolicyRegType, offset: u64) -> Result<Self> {
        check_data_size(value_type, data.len() as u32)?;
        let mut cursor = Cursor::new(data);

        match value_type {
            PolicyRegType::Sz | PolicyRegType::ExpandSz | PolicyRegType::Link => {
                let text = binary::read_string(&mut cursor, data.len() as u32, offset)?;
                Ok(PolicyData::String(text))
            }

            PolicyRegType::MultiSz
            | PolicyRegType::ResourceList
            | PolicyRegType::FullResourceDescriptor
            | PolicyRegType::ResourceRequirementsList => {
                let items = binary::read_strings(&mut cursor, data.len() as u32, offset)?;
                Ok(PolicyData::MultiString(items))
            }

            PolicyRegType::Binary => Ok(PolicyData::Binary(data.to_vec())),

            PolicyRegType::DwordLittleEndian => {
                Ok(PolicyData::Dword(binary::read_u32::<LittleEndian, _>(
                    &mut cursor,
                )?))
            }

            PolicyRegType::DwordBigEndian => Ok(PolicyData::Dword(binary::read_u32::<
                BigEndian,
                _,
            >(&mut cursor)?)),

            PolicyRegType::QwordLittleEndian => {
                Ok(PolicyData::Qword(binary::read_u64::<LittleEndian, _>(
                    &mut cursor,
                )?))
            }

            PolicyRegType::QwordBigEndian => Ok(PolicyData::Qword(binary::read_u64::<
                BigEndian,
                _,
            >(&mut cursor)?)),
        }
    }

    /// Encodes the payload to its wire form under the given type.
    ///
    /// Fails with [`PolicyError::DataTypeMismatch`] if the payload shape
    /// does not belong to the type.
    pub fn encode(&self, value_type: PolicyRegType) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        match (value_type, self) {
            (
                PolicyRegType::Sz | PolicyRegType::ExpandSz | PolicyRegType::Link,
                PolicyData::String(text),
            ) => {
                binary::write_string(&mut buf, text)?;
            }

            (
                PolicyRegType::MultiSz
                | PolicyRegType::ResourceList
                | PolicyRegType::FullResourceDescriptor
                | PolicyRegType::ResourceRequirementsList,
                PolicyData::MultiString(items),
            ) => {
                binary::write_strings(&mut buf, items)?;
            }

            (PolicyRegType::Binary, PolicyData::Binary(bytes)) => {
                binary::write_bytes(&mut buf, bytes)?;
            }

            (PolicyRegType::DwordLittleEndian, PolicyData::Dword(v)) => {
                binary::write_u32::<LittleEndian, _>(&mut buf, *v)?;
            }

            (PolicyRegType::DwordBigEndian, PolicyData::Dword(v)) => {
                binary::write_u32::<BigEndian, _>(&mut buf, *v)?;
            }

            (PolicyRegType::QwordLittleEndian, PolicyData::Qword(v)) => {
                binary::write_u64::<LittleEndian, _>(&mut buf, *v)?;
            }

            (PolicyRegType::QwordBigEndian, PolicyData::Qword(v)) => {
                binary::write_u64::<BigEndian, _>(&mut buf, *v)?;
            }

            _ => {
                return Err(PolicyError::DataTypeMismatch {
                    value_type: value_type.name(),
                })
            }
        }

        Ok(buf)
    }

    /// Returns true if this payload shape belongs to the given type.
    pub fn matches_type(&self, value_type: PolicyRegType) -> bool {
        match self {
            PolicyData::String(_) => value_type.is_text(),
            PolicyData::MultiString(_) => value_type.is_text_list(),
            PolicyData::Binary(_) => value_type == PolicyRegType::Binary,
            PolicyData::Dword(_) => matches!(
                value_type,
                PolicyRegType::DwordLittleEndian | PolicyRegType::DwordBigEndian
            ),
            PolicyData::Qword(_) => matches!(
                value_type,
                PolicyRegType::QwordLittleEndian | PolicyRegType::QwordBigEndian
            ),
        }
    }
}

impl fmt::Display for PolicyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyData::String(s) => f.write_str(s),
            PolicyData::MultiString(items) => write!(f, "{}", items.join(", ")),
            PolicyData::Binary(b) => write!(f, "{:02X?}", b),
            PolicyData::Dword(d) => write!(f, "{} (0x{:08X})", d, d),
            PolicyData::Qword(q) => write!(f, "{} (0x{:016X})", q, q),
        }
    }
}
