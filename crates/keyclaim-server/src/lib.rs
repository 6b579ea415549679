//! keyclaim-server: the claim-and-update protocol server.
//!
//! Turns a signed update request into idempotent record mutations against a
//! name-to-address record store, enforcing first-claim-wins ownership.
//!
//! # Pipeline
//!
//! Requests pass through a fixed-order pipeline; the first failing stage
//! determines the reported error:
//!
//! 1. transport shape (method, body size ceiling, JSON decoding)
//! 2. name syntax
//! 3. replay window (±300 s around server time)
//! 4. key/signature decoding and verification
//! 5. per-key rate limit
//! 6. reconciliation against the record store
//!
//! The rate limit is keyed by the verified public key, so forged requests
//! cannot exhaust another key's quota, and limited requests never touch the
//! store. The concrete store backend lives behind [`store::RecordStore`].

pub mod config;
pub mod http;
pub mod limit;
pub mod monitor;
pub mod reconcile;
pub mod server;
pub mod store;
pub mod validate;

// Re-exports for convenience.
pub use config::ServerConfig;
pub use http::AppState;

/// Result type for server operations.
pub type Result<T> = keyclaim_core::Result<T>;
