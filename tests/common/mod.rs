use std::io::Write;

use tempfile::NamedTempFile;

pub const R0: u16 = 32768;

/// `add r0 4 5; out r0; halt`
pub const ADD_AND_PRINT: &[u16] = &[9, R0, 4, 5, 19, R0, 0];

/// Write `words` to a temporary image file, removed on drop.
pub fn image(words: &[u16]) -> NamedTempFile {
    raw_image(&synvm::loader::encode_image(words))
}

pub fn raw_image(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(bytes).expect("failed to write image");
    file.flush().expect("failed to flush image");
    file
}
