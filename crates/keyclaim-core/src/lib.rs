//! Core types for the keyclaim dynamic DNS protocol.
//!
//! A client claims a subdomain by proving possession of an Ed25519 private
//! key; the server binds the name to the key on first claim and thereafter
//! only the same key may update the name's address. This crate holds the
//! pieces shared by both sides:
//!
//! - **Errors**: every protocol error kind, with [`UpdateError`]
//! - **Names**: the subdomain syntax constraint
//! - **Codec**: base32 text encoding for keys and signatures
//! - **Keys**: the [`Credential`] keypair wrapper
//! - **Requests**: the signed [`UpdateRequest`] wire payload
//!
//! # Example
//!
//! ```rust,ignore
//! use keyclaim_core::{Credential, UpdateRequest};
//!
//! let credential = Credential::generate()?;
//! let request = UpdateRequest::signed(&credential, "myhome", chrono::Utc::now().timestamp());
//! request.verify_signature()?;
//! ```

mod codec;
mod error;
mod keys;
mod name;
mod request;

pub use codec::{decode, encode};
pub use error::{Result, UpdateError};
pub use keys::{decode_public_key, decode_signature, Credential, PUBLIC_KEY_LEN, SIGNATURE_LEN};
pub use name::{validate_name, MIN_NAME_LEN};
pub use request::{signed_message, UpdateRequest};
