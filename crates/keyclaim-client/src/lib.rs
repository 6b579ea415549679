//! keyclaim-client: sends signed claim-and-update requests.
//!
//! - [`UpdateClient`]: builds, signs, and posts update payloads
//! - [`keyfile`]: load-or-generate credential persistence
//! - [`daemon`]: the fixed-interval resend loop

pub mod client;
pub mod daemon;
pub mod keyfile;

pub use client::{UpdateClient, UpdateClientBuilder};
