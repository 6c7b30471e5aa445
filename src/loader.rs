use std::fs;
use std::path::Path;

use miette::Result;

use crate::error;
use crate::memory::MEMORY_SIZE;

/// Read a program image from disk.
pub fn read_image(path: &Path) -> Result<Vec<u16>> {
    let bytes = fs::read(path).map_err(|err| error::load_unreadable(path, err))?;
    decode_image(&bytes)
}

/// Decode little-endian words, dropping anything that does not fit in memory.
///
/// An image with an odd amount of bytes is rejected.
pub fn decode_image(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(error::load_misaligned(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .take(MEMORY_SIZE)
        .map(|word| u16::from_le_bytes([word[0], word[1]]))
        .collect())
}

/// Encode words as an image, the inverse of [`decode_image`].
pub fn encode_image(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}
