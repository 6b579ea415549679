//! Fixed-interval update loop.
//!
//! The loop is deliberately unconditional: every outcome, success or
//! failure, is followed by the same sleep and resend. Rejected requests are
//! corrected by the operator and picked up on the next tick; the server
//! never retries on our behalf.

use std::time::Duration;

use tracing::{info, warn};

use crate::UpdateClient;
use keyclaim_core::Credential;

/// Send one update per `interval`, forever.
pub async fn run(
    client: &UpdateClient,
    credential: &Credential,
    subdomain: &str,
    interval: Duration,
) -> ! {
    loop {
        match client.send(credential, subdomain).await {
            Ok(body) => info!(response = %body, "update accepted"),
            Err(error) => warn!(%error, "update failed"),
        }
        tokio::time::sleep(interval).await;
    }
}
