//! End-to-end tests for the `/update` endpoint: a real listener, real HTTP
//! requests, and the in-memory record store.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use keyclaim_core::{Credential, UpdateError, UpdateRequest};
use keyclaim_server::config::ServerConfig;
use keyclaim_server::http::{router, AppState};
use keyclaim_server::monitor::{ErrorReporter, LogReporter};
use keyclaim_server::store::{MemoryStore, RecordKind, RecordSet, RecordStore};

const DOMAIN: &str = "dyn.example.net";

#[derive(Default)]
struct CountingReporter {
    reports: AtomicUsize,
}

impl CountingReporter {
    fn count(&self) -> usize {
        self.reports.load(Ordering::SeqCst)
    }
}

impl ErrorReporter for CountingReporter {
    fn report(&self, _context: &str, _error: &UpdateError) {
        self.reports.fetch_add(1, Ordering::SeqCst);
    }
}

struct TestServer {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
}

impl TestServer {
    async fn spawn(config: ServerConfig) -> Self {
        Self::spawn_with_reporter(config, Arc::new(LogReporter::new())).await
    }

    async fn spawn_with_reporter(config: ServerConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn RecordStore>,
            reporter,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self { addr, store }
    }

    fn url(&self) -> String {
        format!("http://{}/update", self.addr)
    }

    async fn post(&self, request: &UpdateRequest) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url())
            .json(request)
            .send()
            .await
            .unwrap()
    }

    async fn records(&self, subdomain: &str) -> Vec<RecordSet> {
        self.store
            .list_records(&format!("{subdomain}.{DOMAIN}."))
            .await
            .unwrap()
    }
}

fn fresh_request(credential: &Credential, subdomain: &str) -> UpdateRequest {
    UpdateRequest::signed(credential, subdomain, Utc::now().timestamp())
}

#[tokio::test]
async fn test_first_claim_succeeds() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let credential = Credential::generate().unwrap();

    let response = server.post(&fresh_request(&credential, "myhome")).await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-keyclaim-version"));
    let body = response.text().await.unwrap();
    assert_eq!(body, format!("successfully updated myhome.{DOMAIN}."));

    let records = server.records("myhome").await;
    let owner = records.iter().find(|r| r.kind == RecordKind::Owner).unwrap();
    assert_eq!(owner.values[0], credential.public_key_encoded());
    assert!(records.iter().any(|r| r.kind == RecordKind::Address));
}

#[tokio::test]
async fn test_forwarded_for_sets_address() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let credential = Credential::generate().unwrap();

    let response = reqwest::Client::new()
        .post(server.url())
        .header("x-forwarded-for", "198.51.100.9")
        .json(&fresh_request(&credential, "myhome"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let records = server.records("myhome").await;
    let address = records
        .iter()
        .find(|r| r.kind == RecordKind::Address)
        .unwrap();
    assert_eq!(address.values[0], "198.51.100.9");
}

#[tokio::test]
async fn test_conflicting_key_is_forbidden() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let owner = Credential::generate().unwrap();
    let intruder = Credential::generate().unwrap();

    assert_eq!(server.post(&fresh_request(&owner, "myhome")).await.status(), 200);

    let response = server.post(&fresh_request(&intruder, "myhome")).await;
    assert_eq!(response.status(), 403);

    // Store unchanged: still owned by the first key.
    let records = server.records("myhome").await;
    let record = records.iter().find(|r| r.kind == RecordKind::Owner).unwrap();
    assert_eq!(record.values[0], owner.public_key_encoded());
}

#[tokio::test]
async fn test_reserved_name_is_unauthorized() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    server
        .store
        .seed(
            &format!("legacy.{DOMAIN}."),
            vec![RecordSet::single(RecordKind::Address, "192.0.2.1", 3600)],
        )
        .unwrap();

    let credential = Credential::generate().unwrap();
    let response = server.post(&fresh_request(&credential, "legacy")).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_short_name_rejected() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let credential = Credential::generate().unwrap();

    let response = server.post(&fresh_request(&credential, "abc")).await;
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("name"));
}

#[tokio::test]
async fn test_stale_timestamp_rejected() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let credential = Credential::generate().unwrap();

    let request = UpdateRequest::signed(&credential, "myhome", Utc::now().timestamp() - 301);
    let response = server.post(&request).await;
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("timestamp"));
    assert!(server.records("myhome").await.is_empty());
}

#[tokio::test]
async fn test_tampered_signature_rejected() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let credential = Credential::generate().unwrap();

    let mut request = fresh_request(&credential, "myhome");
    request.subdomain = "other1".to_string();
    let response = server.post(&request).await;
    assert_eq!(response.status(), 400);
    assert!(server.records("other1").await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let server = TestServer::spawn(ServerConfig::new(DOMAIN)).await;
    let response = reqwest::Client::new()
        .post(server.url())
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_get_method_not_allowed_and_reported() {
    let reporter = Arc::new(CountingReporter::default());
    let server = TestServer::spawn_with_reporter(
        ServerConfig::new(DOMAIN),
        Arc::clone(&reporter) as Arc<dyn ErrorReporter>,
    )
    .await;

    let response = reqwest::Client::new()
        .get(server.url())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 405);
    assert!(response.headers().contains_key("x-keyclaim-version"));
    assert_eq!(reporter.count(), 1, "wrong-method requests reach the reporter");
}

#[tokio::test]
async fn test_rate_limit_kicks_in() {
    let mut config = ServerConfig::new(DOMAIN);
    config.rate.max_requests = 3;
    let server = TestServer::spawn(config).await;
    let credential = Credential::generate().unwrap();

    for _ in 0..3 {
        let response = server.post(&fresh_request(&credential, "myhome")).await;
        assert_eq!(response.status(), 200);
    }
    let response = server.post(&fresh_request(&credential, "myhome")).await;
    assert_eq!(response.status(), 429);

    // A different key still gets through.
    let other = Credential::generate().unwrap();
    let response = server.post(&fresh_request(&other, "elsewhere")).await;
    assert_eq!(response.status(), 200);
}
