//! Credential keypair and key material decoding.
//!
//! Ownership of a subdomain is proven solely by possession of an Ed25519
//! private key. The [`Credential`] is generated once on the client,
//! persisted as the base32-encoded 32-byte seed, and loaded on every run.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::RngCore;

use crate::{codec, Result, UpdateError};

/// Byte length of an encoded Ed25519 public key
pub const PUBLIC_KEY_LEN: usize = 32;

/// Byte length of an Ed25519 signature
pub const SIGNATURE_LEN: usize = 64;

/// Client signing keypair.
///
/// Wraps an Ed25519 signing key. The seed is the only secret; everything
/// else derives from it.
#[derive(Clone)]
pub struct Credential {
    signing_key: SigningKey,
}

impl Credential {
    /// Generate a fresh credential from the OS random source.
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| UpdateError::KeyGeneration(e.to_string()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Reconstruct a credential from its base32-encoded seed.
    pub fn from_encoded(text: &str) -> Result<Self> {
        let bytes = codec::decode(text.trim())?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| UpdateError::KeyDecode("private key must be a 32-byte seed".into()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Base32-encoded seed, the key-file format.
    #[must_use]
    pub fn to_encoded(&self) -> String {
        codec::encode(&self.signing_key.to_bytes())
    }

    /// Base32-encoded public key, the form sent on the wire and stored in
    /// ownership records.
    #[must_use]
    pub fn public_key_encoded(&self) -> String {
        codec::encode(self.signing_key.verifying_key().as_bytes())
    }

    /// Sign a message with this credential.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

// Keeps the seed out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED])")
    }
}

/// Decode a base32 public key, checking the expected byte length.
pub fn decode_public_key(text: &str) -> Result<VerifyingKey> {
    let bytes = codec::decode(text)?;
    let arr: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
        UpdateError::KeyDecode(format!("public key must be {PUBLIC_KEY_LEN} bytes"))
    })?;
    VerifyingKey::from_bytes(&arr).map_err(|e| UpdateError::KeyDecode(e.to_string()))
}

/// Decode a base32 signature, checking the expected byte length.
pub fn decode_signature(text: &str) -> Result<Signature> {
    let bytes = codec::decode(text)?;
    let arr: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
        UpdateError::KeyDecode(format!("signature must be {SIGNATURE_LEN} bytes"))
    })?;
    Ok(Signature::from_bytes(&arr))
}
