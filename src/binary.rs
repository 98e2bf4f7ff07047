//! Byte-level primitives for binary parsing and string transcoding.
//!
//! This is the only layer that touches raw byte order and character
//! encoding. Everything above it works with host-native integers and
//! UTF-8 strings. Wire text is UTF-16LE; fixed-width integers are read
//! and written under an explicit byte order.

use crate::error::{PolicyError, Result};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use encoding_rs::UTF_16LE;
use std::io::{Read, Write};

/// Reads a u16 from the stream under the byte order `B`.
pub fn read_u16<B: ByteOrder, R: Read>(stream: &mut R) -> Result<u16> {
    Ok(stream.read_u16::<B>()?)
}

/// Reads a u32 from the stream under the byte order `B`.
pub fn read_u32<B: ByteOrder, R: Read>(stream: &mut R) -> Result<u32> {
    Ok(stream.read_u32::<B>()?)
}

/// Reads a u64 from the stream under the byte order `B`.
pub fn read_u64<B: ByteOrder, R: Read>(stream: &mut R) -> Result<u64> {
    Ok(stream.read_u64::<B>()?)
}

/// Writes a u16 to the stream under the byte order `B`.
pub fn write_u16<B: ByteOrder, W: Write>(stream: &mut W, value: u16) -> Result<()> {
    Ok(stream.write_u16::<B>(value)?)
}

/// Writes a u32 to the stream under the byte order `B`.
pub fn write_u32<B: ByteOrder, W: Write>(stream: &mut W, value: u32) -> Result<()> {
    Ok(stream.write_u32::<B>(value)?)
}

/// Writes a u64 to the stream under the byte order `B`.
pub fn write_u64<B: ByteOrder, W: Write>(stream: &mut W, value: u64) -> Result<()> {
    Ok(stream.write_u64::<B>(value)?)
}

/// Reads exactly `size` raw bytes from the stream.
pub fn read_bytes<R: Read>(stream: &mut R, size: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; size];
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

/// Writes raw bytes to the stream.
pub fn write_bytes<W: Write>(stream: &mut W, data: &[u8]) -> Result<()> {
    stream.write_all(data)?;
    Ok(())
}

/// Decodes a UTF-16LE byte block to UTF-8.
///
/// The block length must be even. Malformed code units (unpaired
/// surrogates) are rejected rather than replaced.
///
/// `offset` is the stream position of the block, used for error reporting.
pub fn decode_utf16le(data: &[u8], offset: u64) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(PolicyError::InvalidUtf16 { offset });
    }
    if data.is_empty() {
        return Ok(String::new());
    }

    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(data);
    if had_errors {
        return Err(PolicyError::InvalidUtf16 { offset });
    }

    Ok(decoded.into_owned())
}

/// Reads a NUL-terminated UTF-16LE string of exactly `size` bytes.
///
/// The final code unit must be U+0000; it is stripped and the remainder
/// transcoded to UTF-8. A block of 2 bytes decodes to the empty string.
pub fn read_string<R: Read>(stream: &mut R, size: u32, offset: u64) -> Result<String> {
    if size % 2 != 0 {
        return Err(PolicyError::InvalidUtf16 { offset });
    }
    if size < 2 {
        return Err(PolicyError::MissingNulTerminator { offset });
    }

    let buf = read_bytes(stream, size as usize)?;
    let (text, terminator) = buf.split_at(buf.len() - 2);
    if terminator != [0, 0] {
        return Err(PolicyError::MissingNulTerminator { offset });
    }

    decode_utf16le(text, offset)
}

/// Writes `text` as UTF-16LE followed by a U+0000 terminator.
///
/// Returns the number of bytes emitted (always even, at least 2).
pub fn write_string<W: Write>(stream: &mut W, text: &str) -> Result<usize> {
    let mut written = 0usize;
    for unit in text.encode_utf16() {
        write_u16::<LittleEndian, _>(stream, unit)?;
        written += 2;
    }
    write_u16::<LittleEndian, _>(stream, 0)?;
    Ok(written + 2)
}

/// Reads a block of NUL-terminated UTF-16LE strings of exactly `size` bytes.
///
/// Each element is terminated by U+0000 and the whole block ends with one
/// additional U+0000, so a 2-byte block decodes to the empty list. The
/// closing terminator must be present and must follow the last element's
/// own terminator.
pub fn read_strings<R: Read>(stream: &mut R, size: u32, offset: u64) -> Result<Vec<String>> {
    if size % 2 != 0 {
        return Err(PolicyError::InvalidUtf16 { offset });
    }
    if size < 2 {
        return Err(PolicyError::MissingNulTerminator { offset });
    }

    let buf = read_bytes(stream, size as usize)?;
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut pos = 0usize;
    while pos + 2 <= buf.len() {
        if LittleEndian::read_u16(&buf[pos..pos + 2]) == 0 {
            pieces.push(decode_utf16le(&buf[start..pos], offset + start as u64)?);
            start = pos + 2;
        }
        pos += 2;
    }

    // Every piece is NUL-terminated, and the block terminator itself
    // produces one final empty piece.
    if start != buf.len() {
        return Err(PolicyError::MissingNulTerminator {
            offset: offset + start as u64,
        });
    }
    match pieces.pop() {
        Some(last) if last.is_empty() => Ok(pieces),
        _ => Err(PolicyError::MissingNulTerminator { offset }),
    }
}

/// Writes each element as a NUL-terminated UTF-16LE string and closes the
/// block with one additional U+0000.
///
/// Returns the number of bytes emitted. An empty list emits a single
/// U+0000 code unit (2 bytes).
pub fn write_strings<W: Write>(stream: &mut W, items: &[String]) -> Result<usize> {
    let mut written = 0usize;
    for item in items {
        written += write_string(stream, item)?;
    }
    write_u16::<LittleEndian, _>(stream, 0)?;
    Ok(written + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::BigEndian;
    use std::io::Cursor;

    #[test]
    fn test_read_u32_byte_orders() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(
            read_u32::<LittleEndian, _>(&mut Cursor::new(&data)).unwrap(),
            0x04030201
        );
        assert_eq!(
            read_u32::<BigEndian, _>(&mut Cursor::new(&data)).unwrap(),
            0x01020304
        );
    }

    #[test]
    fn test_read_u64_short_stream() {
        let data = [0x01, 0x02];
        let result = read_u64::<LittleEndian, _>(&mut Cursor::new(&data));
        assert!(matches!(result, Err(PolicyError::Io(_))));
    }

    #[test]
    fn test_write_u32_round_trip() {
        let mut buf = Vec::new();
        write_u32::<BigEndian, _>(&mut buf, 0xDEADBEEF).unwrap();
        assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_read_string_basic() {
        // "Hi" + NUL16
        let data = [0x48, 0x00, 0x69, 0x00, 0x00, 0x00];
        let s = read_string(&mut Cursor::new(&data), 6, 0).unwrap();
        assert_eq!(s, "Hi");
    }

    #[test]
    fn test_read_string_empty() {
        let data = [0x00, 0x00];
        let s = read_string(&mut Cursor::new(&data), 2, 0).unwrap();
        assert_eq!(s, "");
    }

    #[test]
    fn test_read_string_odd_size() {
        let data = [0x48, 0x00, 0x00];
        let result = read_string(&mut Cursor::new(&data), 3, 0);
        assert!(matches!(result, Err(PolicyError::InvalidUtf16 { .. })));
    }

    #[test]
    fn test_read_string_missing_terminator() {
        let data = [0x48, 0x00, 0x69, 0x00];
        let result = read_string(&mut Cursor::new(&data), 4, 0);
        assert!(matches!(
            result,
            Err(PolicyError::MissingNulTerminator { .. })
        ));
    }

    #[test]
    fn test_read_string_unpaired_surrogate() {
        // Lone high surrogate D800 followed by the terminator.
        let data = [0x00, 0xD8, 0x00, 0x00];
        let result = read_string(&mut Cursor::new(&data), 4, 0);
        assert!(matches!(result, Err(PolicyError::InvalidUtf16 { .. })));
    }

    #[test]
    fn test_write_string_returns_size() {
        let mut buf = Vec::new();
        let n = write_string(&mut buf, "X").unwrap();
        assert_eq!(n, 4);
        assert_eq!(buf, [0x58, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_write_string_empty() {
        let mut buf = Vec::new();
        let n = write_string(&mut buf, "").unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf, [0x00, 0x00]);
    }

    #[test]
    fn test_string_non_ascii_round_trip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "héllo \u{1F600}").unwrap();
        let s = read_string(&mut Cursor::new(&buf), buf.len() as u32, 0).unwrap();
        assert_eq!(s, "héllo \u{1F600}");
    }

    #[test]
    fn test_read_strings_two_elements() {
        // "a" NUL "b" NUL NUL
        let data = [0x61, 0x00, 0x00, 0x00, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00];
        let items = read_strings(&mut Cursor::new(&data), 10, 0).unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_read_strings_empty_block() {
        let data = [0x00, 0x00];
        let items = read_strings(&mut Cursor::new(&data), 2, 0).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_read_strings_empty_element() {
        // [""] is two NUL16s: the element terminator plus the block terminator.
        let data = [0x00, 0x00, 0x00, 0x00];
        let items = read_strings(&mut Cursor::new(&data), 4, 0).unwrap();
        assert_eq!(items, vec![String::new()]);
    }

    #[test]
    fn test_read_strings_missing_block_terminator() {
        // "a" NUL "b" NUL with no closing NUL.
        let data = [0x61, 0x00, 0x00, 0x00, 0x62, 0x00, 0x00, 0x00];
        let result = read_strings(&mut Cursor::new(&data), 8, 0);
        assert!(matches!(
            result,
            Err(PolicyError::MissingNulTerminator { .. })
        ));
    }

    #[test]
    fn test_read_strings_unterminated_tail() {
        // "a" NUL NUL "b" — trailing element never terminated.
        let data = [0x61, 0x00, 0x00, 0x00, 0x00, 0x00, 0x62, 0x00];
        let result = read_strings(&mut Cursor::new(&data), 8, 0);
        assert!(matches!(
            result,
            Err(PolicyError::MissingNulTerminator { .. })
        ));
    }

    #[test]
    fn test_write_strings_framing() {
        let mut buf = Vec::new();
        let items = vec!["a".to_string(), "b".to_string()];
        let n = write_strings(&mut buf, &items).unwrap();
        assert_eq!(n, 10);
        assert_eq!(
            buf,
            [0x61, 0x00, 0x00, 0x00, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_write_strings_empty_list() {
        let mut buf = Vec::new();
        let n = write_strings(&mut buf, &[]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf, [0x00, 0x00]);
    }

    #[test]
    fn test_strings_round_trip_with_empty_element() {
        let items = vec!["a".to_string(), String::new(), "b".to_string()];
        let mut buf = Vec::new();
        write_strings(&mut buf, &items).unwrap();
        let back = read_strings(&mut Cursor::new(&buf), buf.len() as u32, 0).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn test_read_bytes_exact() {
        let data = [1u8, 2, 3];
        assert_eq!(read_bytes(&mut Cursor::new(&data), 2).unwrap(), vec![1, 2]);
        assert!(read_bytes(&mut Cursor::new(&data), 4).is_err());
    }
}
