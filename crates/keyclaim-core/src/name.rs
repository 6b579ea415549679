//! Subdomain name constraint.
//!
//! Applied identically on the client (pre-flight) and the server
//! (authoritative): at least four characters, lowercase `a-z` and `0-9`
//! only. No dots, no uppercase, no symbols.

use crate::{Result, UpdateError};

/// Minimum length of a claimable subdomain
pub const MIN_NAME_LEN: usize = 4;

/// Check a subdomain against the name constraint.
pub fn validate_name(name: &str) -> Result<()> {
    if name.len() < MIN_NAME_LEN {
        return Err(UpdateError::NameSyntax(format!(
            "name must be at least {MIN_NAME_LEN} characters long"
        )));
    }
    if !name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        return Err(UpdateError::NameSyntax(
            "name may only contain a-z and 0-9".to_string(),
        ));
    }
    Ok(())
}
