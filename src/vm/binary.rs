//! Binary image format
//!
//! ## Layout
//!
//! ```text
//! IMAGE (no header, no metadata)
//! └── Words: [u16 little-endian; len / 2]
//!     word i occupies bytes 2i, 2i+1
//! ```
//!
//! At most [`MAX_LOAD_SIZE`] bytes (one byte pair per memory word).

use super::memory::MEMORY_WORDS;
use super::word::Word;
use crate::error::LoadError;
use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;

/// Word size in bytes
pub const WORD_SIZE: usize = 2;

/// Largest accepted image in bytes
pub const MAX_LOAD_SIZE: usize = MEMORY_WORDS * WORD_SIZE;

/// Check an image's size constraints without decoding it
pub fn check_size(bytes: &[u8]) -> std::result::Result<(), LoadError> {
    if bytes.len() > MAX_LOAD_SIZE {
        return Err(LoadError::SizeExceeded {
            size: bytes.len(),
            max: MAX_LOAD_SIZE,
        });
    }
    if bytes.len() % WORD_SIZE != 0 {
        return Err(LoadError::MisalignedLength(bytes.len()));
    }
    Ok(())
}

/// Decode a raw image into words
pub fn decode_image(bytes: &[u8]) -> std::result::Result<Vec<Word>, LoadError> {
    check_size(bytes)?;
    Ok(bytes
        .chunks_exact(WORD_SIZE)
        .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Encode words into a raw image
pub fn encode_image(words: &[Word]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * WORD_SIZE);
    for word in words {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// Read an image file
///
/// Only file access is checked here; size and alignment are validated
/// when the bytes are loaded into a VM.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Write words to an image file
pub fn save_to_file(words: &[Word], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&encode_image(words))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian() {
        assert_eq!(decode_image(&[0x13, 0x00, 0x41, 0x00]).unwrap(), vec![19, 65]);
        assert_eq!(decode_image(&[0x00, 0x80]).unwrap(), vec![32768]);
        assert_eq!(encode_image(&[32775, 1]), vec![0x07, 0x80, 0x01, 0x00]);
    }

    #[test]
    fn test_size_limits() {
        assert!(decode_image(&vec![0u8; MAX_LOAD_SIZE]).is_ok());
        assert_eq!(
            decode_image(&vec![0u8; 70000]),
            Err(LoadError::SizeExceeded { size: 70000, max: 65536 })
        );
        assert_eq!(decode_image(&[1, 0, 2]), Err(LoadError::MisalignedLength(3)));
        assert_eq!(decode_image(&[]).unwrap(), Vec::<Word>::new());
    }

    #[test]
    fn test_file_roundtrip() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("program.bin");
        let words = vec![9, 32768, 32769, 4, 19, 32768, 0];

        save_to_file(&words, &path).unwrap();
        let bytes = load_from_file(&path).unwrap();
        assert_eq!(bytes.len(), words.len() * WORD_SIZE);
        assert_eq!(decode_image(&bytes).unwrap(), words);
    }

    #[test]
    fn test_missing_file() {
        let err = load_from_file("definitely/does/not/exist.bin").unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
