//! Registry value type tags.
//!
//! PReg instructions carry one of twelve registry value types. Unlike
//! registry hives, the PReg grammar is closed: tag 0 (REG_NONE) and tags
//! above 12 never appear on the wire and are rejected.

use crate::error::{PolicyError, Result};
use std::fmt;

/// Registry value type carried by a PReg instruction.
///
/// The discriminants are the on-wire tags. Byte order of numeric payloads
/// is part of the tag, not of the in-memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum PolicyRegType {
    /// String (null-terminated on the wire).
    Sz = 1,

    /// String with unexpanded environment variable references.
    ExpandSz = 2,

    /// Raw binary data.
    Binary = 3,

    /// 32-bit little-endian integer.
    DwordLittleEndian = 4,

    /// 32-bit big-endian integer.
    DwordBigEndian = 5,

    /// Symbolic link target path.
    Link = 6,

    /// Sequence of strings.
    MultiSz = 7,

    /// Resource list.
    ResourceList = 8,

    /// Full resource descriptor.
    FullResourceDescriptor = 9,

    /// Resource requirements list.
    ResourceRequirementsList = 10,

    /// 64-bit little-endian integer.
    QwordLittleEndian = 11,

    /// 64-bit big-endian integer.
    QwordBigEndian = 12,
}

impl PolicyRegType {
    /// Parses a type tag from its on-wire u32.
    ///
    /// Tags outside 1..=12 are illegal in PReg, including REG_NONE (0).
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            1 => Ok(PolicyRegType::Sz),
            2 => Ok(PolicyRegType::ExpandSz),
            3 => Ok(PolicyRegType::Binary),
            4 => Ok(PolicyRegType::DwordLittleEndian),
            5 => Ok(PolicyRegType::DwordBigEndian),
            6 => Ok(PolicyRegType::Link),
            7 => Ok(PolicyRegType::MultiSz),
            8 => Ok(PolicyRegType::ResourceList),
            9 => Ok(PolicyRegType::FullResourceDescriptor),
            10 => Ok(PolicyRegType::ResourceRequirementsList),
            11 => Ok(PolicyRegType::QwordLittleEndian),
            12 => Ok(PolicyRegType::QwordBigEndian),
            _ => Err(PolicyError::InvalidValueType(value)),
        }
    }

    /// Returns the on-wire tag for this type.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Returns the conventional REG_* name of this type.
    pub fn name(self) -> &'static str {
        match self {
            PolicyRegType::Sz => "REG_SZ",
            PolicyRegType::ExpandSz => "REG_EXPAND_SZ",
            PolicyRegType::Binary => "REG_BINARY",
            PolicyRegType::DwordLittleEndian => "REG_DWORD_LITTLE_ENDIAN",
            PolicyRegType::DwordBigEndian => "REG_DWORD_BIG_ENDIAN",
            PolicyRegType::Link => "REG_LINK",
            PolicyRegType::MultiSz => "REG_MULTI_SZ",
            PolicyRegType::ResourceList => "REG_RESOURCE_LIST",
            PolicyRegType::FullResourceDescriptor => "REG_FULL_RESOURCE_DESCRIPTOR",
            PolicyRegType::ResourceRequirementsList => "REG_RESOURCE_REQUIREMENTS_LIST",
            PolicyRegType::QwordLittleEndian => "REG_QWORD_LITTLE_ENDIAN",
            PolicyRegType::QwordBigEndian => "REG_QWORD_BIG_ENDIAN",
        }
    }

    /// Returns true if the payload is a single string.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            PolicyRegType::Sz | PolicyRegType::ExpandSz | PolicyRegType::Link
        )
    }

    /// Returns true if the payload is a list of strings.
    pub fn is_text_list(self) -> bool {
        matches!(
            self,
            PolicyRegType::MultiSz
                | PolicyRegType::ResourceList
                | PolicyRegType::FullResourceDescriptor
                | PolicyRegType::ResourceRequirementsList
        )
    }
}

impl fmt::Display for PolicyRegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
