//! MD5 helpers shared by the credential check, the token minter, and upload
//! checksumming.

use md5::{Digest, Md5};
use std::io::Read;

/// Lowercase hex MD5 of a byte slice.
#[must_use]
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Checksum a stream in 1 KiB chunks, as uploaded attachments are hashed.
///
/// # Errors
/// Returns any error raised by the underlying reader.
pub fn file_checksum<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 1024];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
