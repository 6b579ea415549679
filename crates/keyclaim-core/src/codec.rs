//! Text encoding for keys and signatures.
//!
//! Keys and signatures travel inside a JSON payload, so they are carried as
//! RFC 4648 base32 (uppercase, padded). The alphabet survives copy-paste
//! and case-folding transports better than base64.

use data_encoding::BASE32;

use crate::{Result, UpdateError};

/// Encode bytes to base32 text.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE32.encode(bytes)
}

/// Decode base32 text back to bytes.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    BASE32
        .decode(text.as_bytes())
        .map_err(|e| UpdateError::KeyDecode(e.to_string()))
}
