//! Top-level policy document types.

use crate::instruction::PolicyInstruction;

/// Ordered sequence of policy instructions.
///
/// Instruction order is significant and is preserved verbatim by a parse
/// and write round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyBody {
    /// The instructions in wire order.
    pub instructions: Vec<PolicyInstruction>,
}

impl PolicyBody {
    /// Creates a body from a list of instructions.
    pub fn new(instructions: Vec<PolicyInstruction>) -> Self {
        Self { instructions }
    }

    /// Returns the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the body holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates over the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PolicyInstruction> {
        self.instructions.iter()
    }
}

impl FromIterator<PolicyInstruction> for PolicyBody {
    fn from_iter<I: IntoIterator<Item = PolicyInstruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PolicyBody {
    type Item = &'a PolicyInstruction;
    type IntoIter = std::slice::Iter<'a, PolicyInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// A PReg policy document.
///
/// A document without a body is the empty document: writing it emits no
/// bytes at all, not even the header. A document with an empty body
/// writes the 8-byte header and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyFile {
    /// Document body, absent for the empty document.
    pub body: Option<PolicyBody>,
}

impl PolicyFile {
    /// Creates the empty document (no header, no instructions).
    pub fn empty() -> Self {
        Self { body: None }
    }

    /// Creates a document from a list of instructions.
    pub fn with_instructions(instructions: Vec<PolicyInstruction>) -> Self {
        Self {
            body: Some(PolicyBody::new(instructions)),
        }
    }

    /// Returns the instructions, or an empty slice for the empty document.
    pub fn instructions(&self) -> &[PolicyInstruction] {
        self.body
            .as_ref()
            .map(|b| b.instructions.as_slice())
            .unwrap_or(&[])
    }
}
