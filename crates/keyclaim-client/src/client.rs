//! HTTP client for the update endpoint.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use tracing::debug;

use keyclaim_core::{Credential, Result, UpdateError, UpdateRequest};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for posting signed updates to a keyclaim server.
#[derive(Clone)]
pub struct UpdateClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    endpoint: String,
}

impl UpdateClient {
    /// Create a client for `endpoint` using default settings.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        UpdateClientBuilder::new(endpoint).build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> UpdateClientBuilder {
        UpdateClientBuilder::new(endpoint)
    }

    /// Build, sign, and send an update for `subdomain`.
    ///
    /// Returns the server's success body (the fully-qualified name that was
    /// updated). A non-success response becomes [`UpdateError::Rejected`].
    pub async fn send(&self, credential: &Credential, subdomain: &str) -> Result<String> {
        let request = UpdateRequest::signed(credential, subdomain, Utc::now().timestamp());
        debug!(endpoint = %self.inner.endpoint, subdomain, "posting update");

        let response = self
            .inner
            .http
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpdateError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::Http(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpdateError::Rejected {
                code: status.as_u16(),
                message: body,
            })
        }
    }
}

/// Builder for configuring an [`UpdateClient`]
pub struct UpdateClientBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl UpdateClientBuilder {
    /// Create a new builder for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("keyclaim/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client.
    ///
    /// The socket binds an IPv4 local address so the server-observed
    /// source (and therefore the address record) is an IPv4 address.
    #[must_use]
    pub fn build(self) -> UpdateClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .build()
            .expect("Failed to build HTTP client");

        UpdateClient {
            inner: Arc::new(ClientInner {
                http,
                endpoint: self.endpoint,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_posts_signed_payload() {
        let server = MockServer::start().await;
        let credential = Credential::generate().unwrap();

        Mock::given(method("POST"))
            .and(path("/update"))
            .and(body_partial_json(serde_json::json!({
                "subdomain": "myhome",
                "public_key": credential.public_key_encoded(),
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("successfully updated myhome.dyn.example.net."),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = UpdateClient::new(format!("{}/update", server.uri()));
        let body = client.send(&credential, "myhome").await.unwrap();
        assert!(body.contains("myhome"));
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(403).set_body_string("name owned by another key"))
            .mount(&server)
            .await;

        let credential = Credential::generate().unwrap();
        let client = UpdateClient::new(format!("{}/update", server.uri()));
        let error = client.send(&credential, "myhome").await.unwrap_err();
        match error {
            UpdateError::Rejected { code, message } => {
                assert_eq!(code, 403);
                assert!(message.contains("another key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Nothing listens on this port.
        let client = UpdateClient::builder("http://127.0.0.1:9/update")
            .timeout(Duration::from_millis(200))
            .build();
        let credential = Credential::generate().unwrap();
        assert!(matches!(
            client.send(&credential, "myhome").await,
            Err(UpdateError::Http(_))
        ));
    }
}
