//! The signed update request payload.
//!
//! The message that gets signed is the literal string
//! `"{subdomain},{timestamp}"`. Signer and verifier must reproduce this
//! concatenation byte for byte; any drift makes every signature invalid.

use ed25519_dalek::Verifier;
use serde::{Deserialize, Serialize};

use crate::{codec, keys, Credential, Result, UpdateError};

/// Canonical message covered by the request signature.
#[must_use]
pub fn signed_message(subdomain: &str, timestamp: i64) -> String {
    format!("{subdomain},{timestamp}")
}

/// Wire payload of a claim-and-update request.
///
/// Constructed fresh per send, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Unix seconds UTC at which the request was built
    pub timestamp: i64,

    /// Base32-encoded Ed25519 public key of the requester
    pub public_key: String,

    /// The subdomain being claimed or updated
    pub subdomain: String,

    /// Base32-encoded signature over [`signed_message`]
    pub signature: String,
}

impl UpdateRequest {
    /// Build and sign a request for `subdomain` at `timestamp`.
    #[must_use]
    pub fn signed(credential: &Credential, subdomain: &str, timestamp: i64) -> Self {
        let message = signed_message(subdomain, timestamp);
        let signature = credential.sign(message.as_bytes());
        Self {
            timestamp,
            public_key: credential.public_key_encoded(),
            subdomain: subdomain.to_string(),
            signature: codec::encode(&signature.to_bytes()),
        }
    }

    /// Decode the key material and verify the signature over the
    /// recomputed canonical message.
    pub fn verify_signature(&self) -> Result<()> {
        let public_key = keys::decode_public_key(&self.public_key)?;
        let signature = keys::decode_signature(&self.signature)?;
        let message = signed_message(&self.subdomain, self.timestamp);
        public_key
            .verify(message.as_bytes(), &signature)
            .map_err(|_| UpdateError::SignatureInvalid)
    }
}
