//! The PReg grammar engine.
//!
//! A recursive-descent reader and a mirror writer for the instruction
//! grammar: after the file header, each instruction is a bracketed record
//! of five semicolon-separated fields,
//!
//! ```text
//! [ keypath NUL ; value NUL ; type ; size ; data ]
//! ```
//!
//! where all punctuation is a single UTF-16LE code unit. The reader
//! advances strictly forward; the only lookahead is a one-byte probe used
//! to detect end-of-stream at the top of the instruction loop.

use crate::binary;
use crate::error::{PolicyError, Result};
use crate::header;
use crate::instruction::{
    validate_key_path, validate_value_name, PolicyInstruction, MAX_VALUE_NAME_LEN,
};
use crate::policy::PolicyFile;
use crate::types::PolicyRegType;
use crate::value::{check_data_size, PolicyData};
use byteorder::LittleEndian;
use std::io::{ErrorKind, Read, Write};
use tracing::{debug, instrument, trace};

/// UTF-16LE code unit opening an instruction (`[`).
const LBRACKET: u16 = 0x005B;

/// UTF-16LE code unit closing an instruction (`]`).
const RBRACKET: u16 = 0x005D;

/// UTF-16LE code unit separating instruction fields (`;`).
const SEPARATOR: u16 = 0x003B;

/// UTF-16LE code unit separating key path segments (`\`).
const BACKSLASH: u16 = 0x005C;

/// PReg codec instance.
///
/// The codec holds no state between calls; each parse or write owns its
/// stream exclusively for the duration of the call.
///
/// # Examples
///
/// ```no_run
/// use preg_parser::PregParser;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let parser = PregParser::new();
/// let mut file = File::open("Registry.pol")?;
/// let policy = parser.parse(&mut file)?;
///
/// for instruction in policy.instructions() {
///     println!("{}\\{} = {}", instruction.key, instruction.value, instruction.data);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PregParser;

impl PregParser {
    /// Creates a codec instance.
    pub fn new() -> Self {
        PregParser
    }

    /// Parses a PReg byte stream into a policy document.
    ///
    /// The stream is consumed to end-of-stream. On any grammar violation
    /// the error names the offending construct; the partially-read
    /// document is discarded and the stream position is unspecified.
    #[instrument(skip_all)]
    pub fn parse<R: Read>(&self, stream: &mut R) -> Result<PolicyFile> {
        header::read_header(stream)?;

        let mut reader = RecordReader::new(stream);
        let mut instructions = Vec::new();
        while let Some(unit) = reader.next_unit_or_eof()? {
            if unit != LBRACKET {
                return Err(PolicyError::unexpected_delimiter(
                    '[',
                    unit,
                    reader.offset - 2,
                ));
            }
            let instruction = reader.read_instruction()?;
            trace!(
                key = %instruction.key,
                value = %instruction.value,
                value_type = %instruction.value_type,
                "parsed instruction"
            );
            instructions.push(instruction);
        }

        debug!(instructions = instructions.len(), "parsed PReg document");
        Ok(PolicyFile::with_instructions(instructions))
    }

    /// Writes a policy document as a PReg byte stream.
    ///
    /// A document without a body emits nothing. Every instruction is
    /// validated against the grammar before any of its bytes are emitted,
    /// so the output is always re-parseable.
    #[instrument(skip_all)]
    pub fn write<W: Write>(&self, stream: &mut W, file: &PolicyFile) -> Result<()> {
        let Some(body) = file.body.as_ref() else {
            debug!("empty document, nothing to write");
            return Ok(());
        };

        header::write_header(stream)?;
        for instruction in &body.instructions {
            write_instruction(stream, instruction)?;
        }

        debug!(instructions = body.len(), "wrote PReg document");
        Ok(())
    }
}

/// Reader state for the instruction section of a stream.
///
/// Tracks the absolute byte offset for error reporting; the offset starts
/// past the file header.
struct RecordReader<'a, R: Read> {
    stream: &'a mut R,
    offset: u64,
}

impl<'a, R: Read> RecordReader<'a, R> {
    fn new(stream: &'a mut R) -> Self {
        Self {
            stream,
            offset: header::HEADER_SIZE as u64,
        }
    }

    /// Reads one UTF-16LE code unit.
    fn read_unit(&mut self) -> Result<u16> {
        let unit = binary::read_u16::<LittleEndian, _>(self.stream)?;
        self.offset += 2;
        Ok(unit)
    }

    /// Reads one code unit, or None on a clean end-of-stream.
    ///
    /// End-of-stream is only legal between instructions, so the probe is
    /// a single byte: once the first byte of a unit arrives, the second
    /// must follow.
    fn next_unit_or_eof(&mut self) -> Result<Option<u16>> {
        let mut first = [0u8; 1];
        loop {
            match self.stream.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let mut second = [0u8; 1];
        self.stream.read_exact(&mut second)?;
        self.offset += 2;
        Ok(Some(u16::from_le_bytes([first[0], second[0]])))
    }

    /// Consumes one code unit and requires it to be the given punctuation.
    fn expect(&mut self, expected: char) -> Result<()> {
        let at = self.offset;
        let unit = self.read_unit()?;
        if unit != expected as u16 {
            return Err(PolicyError::unexpected_delimiter(expected, unit, at));
        }
        Ok(())
    }

    /// Reads a little-endian u32 field (type tag or data size).
    fn read_u32_field(&mut self) -> Result<u32> {
        let value = binary::read_u32::<LittleEndian, _>(self.stream)?;
        self.offset += 4;
        Ok(value)
    }

    /// Reads one instruction. The opening bracket is already consumed.
    fn read_instruction(&mut self) -> Result<PolicyInstruction> {
        let key = self.read_key_path()?;
        self.expect(';')?;
        let value = self.read_value_name()?;
        self.expect(';')?;

        let value_type = PolicyRegType::from_u32(self.read_u32_field()?)?;
        self.expect(';')?;

        let size = self.read_u32_field()?;
        self.expect(';')?;

        check_data_size(value_type, size)?;
        let data_at = self.offset;
        let payload = binary::read_bytes(self.stream, size as usize)?;
        self.offset += u64::from(size);
        let data = PolicyData::parse(&payload, value_type, data_at)?;

        self.expect(']')?;

        Ok(PolicyInstruction {
            key,
            value,
            value_type,
            data,
        })
    }

    /// Reads a key path up to its NUL16 terminator.
    ///
    /// Segments are separated by single backslashes; a separator must
    /// follow a key character, and the path must not end on one.
    fn read_key_path(&mut self) -> Result<String> {
        let mut key = String::new();
        let mut segment_open = false;

        loop {
            let at = self.offset;
            let unit = self.read_unit()?;
            match unit {
                0 => break,
                BACKSLASH => {
                    if !segment_open {
                        return Err(PolicyError::invalid_key_path(format!(
                            "empty segment at offset {:#x}",
                            at
                        )));
                    }
                    segment_open = false;
                    key.push('\\');
                }
                0x20..=0x7E => {
                    segment_open = true;
                    key.push(unit as u8 as char);
                }
                other => {
                    return Err(PolicyError::invalid_key_path(format!(
                        "illegal code unit {:#06x} at offset {:#x}",
                        other, at
                    )));
                }
            }
        }

        if key.is_empty() {
            return Err(PolicyError::invalid_key_path("key path is empty"));
        }
        if !segment_open {
            return Err(PolicyError::invalid_key_path(
                "key path ends on a separator",
            ));
        }

        Ok(key)
    }

    /// Reads a value name up to its NUL16 terminator.
    ///
    /// The name may be empty and is capped at 259 code units.
    fn read_value_name(&mut self) -> Result<String> {
        let mut value = String::new();

        loop {
            let at = self.offset;
            let unit = self.read_unit()?;
            match unit {
                0 => break,
                0x20..=0x7E => {
                    if value.len() == MAX_VALUE_NAME_LEN {
                        return Err(PolicyError::invalid_value_name(format!(
                            "longer than {} code units",
                            MAX_VALUE_NAME_LEN
                        )));
                    }
                    value.push(unit as u8 as char);
                }
                other => {
                    return Err(PolicyError::invalid_value_name(format!(
                        "illegal code unit {:#06x} at offset {:#x}",
                        other, at
                    )));
                }
            }
        }

        Ok(value)
    }
}

/// Writes one instruction, validating it first.
fn write_instruction<W: Write>(stream: &mut W, instruction: &PolicyInstruction) -> Result<()> {
    validate_key_path(&instruction.key)?;
    validate_value_name(&instruction.value)?;

    // The payload is staged to a buffer to learn its byte length before
    // the size field is emitted.
    let payload = instruction.data.encode(instruction.value_type)?;
    let size = u32::try_from(payload.len()).map_err(|_| {
        PolicyError::invalid_data_size(instruction.value_type.name(), u32::MAX)
    })?;

    binary::write_u16::<LittleEndian, _>(stream, LBRACKET)?;
    binary::write_string(stream, &instruction.key)?;
    binary::write_u16::<LittleEndian, _>(stream, SEPARATOR)?;
    binary::write_string(stream, &instruction.value)?;
    binary::write_u16::<LittleEndian, _>(stream, SEPARATOR)?;
    binary::write_u32::<LittleEndian, _>(stream, instruction.value_type.as_u32())?;
    binary::write_u16::<LittleEndian, _>(stream, SEPARATOR)?;
    binary::write_u32::<LittleEndian, _>(stream, size)?;
    binary::write_u16::<LittleEndian, _>(stream, SEPARATOR)?;
    binary::write_bytes(stream, &payload)?;
    binary::write_u16::<LittleEndian, _>(stream, RBRACKET)?;

    Ok(())
}
