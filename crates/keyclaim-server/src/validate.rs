//! Server-side validation pipeline.
//!
//! Pure checks only; the single ambient input is the server's current time,
//! passed in by the caller so tests can pin it. Stages run in a fixed order
//! and the first failure wins.

use keyclaim_core::{validate_name, Result, UpdateError, UpdateRequest};

/// Tolerated clock-skew/staleness interval around a request timestamp, in
/// seconds. A captured request becomes unusable once the window closes;
/// within it, verbatim replay is accepted by policy (no nonce store).
pub const REPLAY_WINDOW_SECS: i64 = 300;

/// Accept iff `now - 300 <= timestamp <= now + 300`.
///
/// Bounds are computed on `now` with saturating arithmetic: `timestamp` is
/// attacker-controlled and may sit at the ends of the i64 range.
pub const fn check_replay_window(timestamp: i64, now: i64) -> Result<()> {
    if timestamp < now.saturating_sub(REPLAY_WINDOW_SECS)
        || timestamp > now.saturating_add(REPLAY_WINDOW_SECS)
    {
        return Err(UpdateError::ReplayWindow { timestamp, now });
    }
    Ok(())
}

/// Run the full pipeline on a decoded request: name syntax, replay window,
/// then key/signature decoding and verification.
pub fn validate_update(request: &UpdateRequest, now: i64) -> Result<()> {
    validate_name(&request.subdomain)?;
    check_replay_window(request.timestamp, now)?;
    request.verify_signature()
}
