//! HTTP surface: the `/update` endpoint.
//!
//! The transport layer stays thin: method restriction and the body size
//! ceiling are enforced by the router, JSON decoding happens here, and
//! everything else is delegated to the validation pipeline, the rate
//! limiter, and the reconciler in that order.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, DefaultBodyLimit, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use tracing::info;

use crate::config::ServerConfig;
use crate::limit::KeyRateLimiter;
use crate::monitor::ErrorReporter;
use crate::reconcile::Reconciler;
use crate::store::RecordStore;
use crate::validate;
use keyclaim_core::{Result, UpdateError, UpdateRequest};

/// Body size ceiling; update payloads are a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 50 * 1024;

const VERSION_HEADER: &str = "x-keyclaim-version";

/// Shared server state: the composition root wires these up at process
/// start and hands them to the router.
pub struct AppState {
    pub config: ServerConfig,
    pub limiter: KeyRateLimiter,
    pub reconciler: Reconciler,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl AppState {
    /// Compose the server from its collaborators.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn RecordStore>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let limiter = KeyRateLimiter::new(config.rate.max_requests, config.rate.window());
        let reconciler = Reconciler::new(store, &config);
        Self {
            config,
            limiter,
            reconciler,
            reporter,
        }
    }
}

/// Build the router. Oversized bodies get 413 from the limit layer;
/// wrong-method requests go through `method_not_allowed` so they reach the
/// error reporter like every other rejection.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/update", post(update))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn method_not_allowed(State(state): State<Arc<AppState>>) -> Response {
    let error = UpdateError::Transport("method not allowed, use POST".to_string());
    state.reporter.report("update", &error);
    let mut response =
        (StatusCode::METHOD_NOT_ALLOWED, error.to_string()).into_response();
    response
        .headers_mut()
        .insert(VERSION_HEADER, HeaderValue::from_static(env!("CARGO_PKG_VERSION")));
    response
}

async fn update(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut response = match handle_update(&state, &headers, peer, &body).await {
        Ok(fqdn) => (StatusCode::OK, format!("successfully updated {fqdn}")).into_response(),
        Err(error) => {
            state.reporter.report("update", &error);
            let status = StatusCode::from_u16(error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, error.to_string()).into_response()
        }
    };
    response
        .headers_mut()
        .insert(VERSION_HEADER, HeaderValue::from_static(env!("CARGO_PKG_VERSION")));
    response
}

async fn handle_update(
    state: &AppState,
    headers: &HeaderMap,
    peer: SocketAddr,
    body: &[u8],
) -> Result<String> {
    let request: UpdateRequest = serde_json::from_slice(body)
        .map_err(|e| UpdateError::Transport(format!("invalid payload: {e}")))?;

    validate::validate_update(&request, Utc::now().timestamp())?;

    // Only after the signature checks out, so forged requests cannot drain
    // another key's quota.
    if state.limiter.check(&request.public_key) {
        return Err(UpdateError::RateLimitExceeded);
    }

    let address = client_address(headers, peer);
    let outcome = state
        .reconciler
        .apply(&request.subdomain, &request.public_key, &address)
        .await?;

    info!(
        fqdn = %outcome.fqdn,
        first_claim = outcome.first_claim,
        address_written = outcome.address_written,
        "update applied"
    );
    Ok(outcome.fqdn)
}

/// The caller's observed address: first `X-Forwarded-For` entry when a
/// proxy fronts us, otherwise the peer socket address.
fn client_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| peer.ip().to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "203.0.113.7:55000".parse().unwrap()
    }

    #[test]
    fn test_client_address_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "198.51.100.2, 10.0.0.1".parse().unwrap());
        assert_eq!(client_address(&headers, peer()), "198.51.100.2");
    }

    #[test]
    fn test_client_address_falls_back_to_peer() {
        assert_eq!(client_address(&HeaderMap::new(), peer()), "203.0.113.7");
    }

    #[test]
    fn test_client_address_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        assert_eq!(client_address(&headers, peer()), "203.0.113.7");
    }
}
