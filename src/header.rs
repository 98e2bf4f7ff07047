//! PReg file header.
//!
//! Every non-empty PReg file starts with an 8-byte header: the ASCII
//! signature `PReg` followed by the version word 1 as a little-endian
//! u32. Both halves are verified on read.

use crate::binary;
use crate::error::{PolicyError, Result};
use byteorder::LittleEndian;
use std::io::{ErrorKind, Read, Write};

/// Expected signature for a valid PReg file.
pub const PREG_SIGNATURE: &[u8; 4] = b"PReg";

/// The only supported PReg format version.
pub const PREG_VERSION: u32 = 1;

/// Total size of the file header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Reads and verifies the 8-byte file header.
///
/// # Errors
///
/// Returns [`PolicyError::InvalidSignature`] if the stream does not start
/// with `PReg` (including an empty or truncated stream, which has no
/// signature at all), and [`PolicyError::UnsupportedVersion`] if the
/// signature matches but the version word is not 1.
pub fn read_header<R: Read>(stream: &mut R) -> Result<()> {
    let mut signature = [0u8; 4];
    let mut filled = 0;
    while filled < signature.len() {
        match stream.read(&mut signature[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if &signature != PREG_SIGNATURE {
        return Err(PolicyError::invalid_signature(*PREG_SIGNATURE, signature));
    }

    let version = binary::read_u32::<LittleEndian, _>(stream)?;
    if version != PREG_VERSION {
        return Err(PolicyError::UnsupportedVersion { version });
    }

    Ok(())
}

/// Writes the 8-byte file header.
pub fn write_header<W: Write>(stream: &mut W) -> Result<()> {
    binary::write_bytes(stream, PREG_SIGNATURE)?;
    binary::write_u32::<LittleEndian, _>(stream, PREG_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_round_trip() {
        let mut buf = Vec::new();
        write_header(&mut buf).unwrap();
        assert_eq!(buf, [0x50, 0x52, 0x65, 0x67, 0x01, 0x00, 0x00, 0x00]);
        assert!(read_header(&mut Cursor::new(&buf)).is_ok());
    }

    #[test]
    fn test_wrong_signature() {
        let data = [0x50, 0x52, 0x65, 0x58, 0x01, 0x00, 0x00, 0x00];
        let result = read_header(&mut Cursor::new(&data));
        assert!(matches!(
            result,
            Err(PolicyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_wrong_version() {
        let data = [0x50, 0x52, 0x65, 0x67, 0x02, 0x00, 0x00, 0x00];
        let result = read_header(&mut Cursor::new(&data));
        assert!(matches!(
            result,
            Err(PolicyError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn test_version_not_just_first_byte() {
        // Correct low byte but nonzero high bytes must still be rejected.
        let data = [0x50, 0x52, 0x65, 0x67, 0x01, 0x00, 0x00, 0x01];
        let result = read_header(&mut Cursor::new(&data));
        assert!(matches!(
            result,
            Err(PolicyError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_empty_stream_has_no_signature() {
        let result = read_header(&mut Cursor::new(&[] as &[u8]));
        assert!(matches!(
            result,
            Err(PolicyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_truncated_signature() {
        let data = [0x50, 0x52];
        let result = read_header(&mut Cursor::new(&data));
        assert!(matches!(
            result,
            Err(PolicyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_truncated_version() {
        let data = [0x50, 0x52, 0x65, 0x67, 0x01];
        let result = read_header(&mut Cursor::new(&data));
        assert!(matches!(result, Err(PolicyError::Io(_))));
    }
}
