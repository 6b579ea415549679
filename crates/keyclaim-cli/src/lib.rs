//! # keyclaim-cli
//!
//! Command-line interface for the keyclaim dynamic DNS protocol:
//!
//! - **update**: claim a subdomain and keep its address current, one-shot
//!   or as a daemon
//! - **keygen**: create the credential file and print the public key
//! - **serve**: run the claim-and-update server

pub mod cli;

pub use cli::run;
