//! End-to-end tests: real HTTP against a mock backend, real `RocksDB` store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use roadwatch_auth::{AuthConfig, Credentials, HttpAuthenticator};
use roadwatch_core::Role;
use roadwatch_gateway::{
    ApiRequest, GatewayConfig, HttpTransport, Navigator, RoleCheck, SessionGateway, StatusCode,
    Transport,
};
use roadwatch_store::schema::keys;
use roadwatch_store::{MemoryStore, RocksStore, SessionStore};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records navigation the way a page host would perform it.
#[derive(Default)]
struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn new() -> Self {
        Self::default()
    }

    fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }

    fn is_idle(&self) -> bool {
        self.redirects.lock().is_empty() && self.alerts.lock().is_empty()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        self.redirects.lock().push(target.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

type Gateway = SessionGateway<RocksStore, HttpTransport, RecordingNavigator>;

fn gateway_for(server: &MockServer, dir: &TempDir) -> (Gateway, Arc<RecordingNavigator>) {
    let config = GatewayConfig {
        api_base_url: server.uri(),
        ..GatewayConfig::default()
    };
    let navigator = Arc::new(RecordingNavigator::new());
    let gateway = SessionGateway::new(
        Arc::new(RocksStore::open(dir.path()).unwrap()),
        HttpTransport::new(Duration::from_secs(5)).unwrap(),
        Arc::clone(&navigator),
        config,
    );
    (gateway, navigator)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-official",
            "role": "official",
            "name": "Test Official"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_then_authenticated_request() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/official/work-reports"))
        .and(header("authorization", "Bearer jwt-official"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 7, "status": "IN_PROGRESS" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (gateway, navigator) = gateway_for(&server, &dir);
    let authenticator = HttpAuthenticator::new(AuthConfig::with_base_url(server.uri())).unwrap();

    let session = gateway
        .establish_session(
            &authenticator,
            &Credentials::new("official@test.com", "password_official"),
        )
        .await
        .unwrap();
    assert_eq!(session.role, Role::Official);

    assert_eq!(gateway.require_role(Role::Official), RoleCheck::Granted);

    let response = gateway
        .dispatch_authenticated(ApiRequest::get("/api/official/work-reports"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let reports: Vec<serde_json::Value> = response.json().unwrap();
    assert_eq!(reports[0]["status"], "IN_PROGRESS");
    assert!(navigator.is_idle());
}

#[tokio::test]
async fn expired_token_ends_persisted_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/citizen/reports"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "msg": "Token has expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    {
        let store = RocksStore::open(dir.path()).unwrap();
        store.set(keys::TOKEN, "stale").unwrap();
        store.set(keys::ROLE, "citizen").unwrap();
        store.set(keys::USER_NAME, "Test Citizen").unwrap();
    }

    {
        let (gateway, navigator) = gateway_for(&server, &dir);
        assert!(gateway.has_session());

        let response = gateway
            .dispatch_authenticated(ApiRequest::get("/api/citizen/reports"))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(navigator.redirects(), vec!["/index.html".to_string()]);
    }

    let store = RocksStore::open(dir.path()).unwrap();
    assert!(store.get(keys::TOKEN).unwrap().is_none());
    assert!(store.get(keys::ROLE).unwrap().is_none());
    assert!(store.get(keys::USER_NAME).unwrap().is_none());
}

#[tokio::test]
async fn session_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let dir = TempDir::new().unwrap();
    {
        let (gateway, _navigator) = gateway_for(&server, &dir);
        let authenticator =
            HttpAuthenticator::new(AuthConfig::with_base_url(server.uri())).unwrap();
        gateway
            .establish_session(
                &authenticator,
                &Credentials::new("official@test.com", "password_official"),
            )
            .await
            .unwrap();
    }

    let (gateway, _navigator) = gateway_for(&server, &dir);
    assert_eq!(gateway.current_role(), Some(Role::Official));
    assert_eq!(gateway.display_name().as_deref(), Some("Test Official"));
}

#[tokio::test]
async fn unreachable_backend_keeps_session() {
    let dir = TempDir::new().unwrap();
    let store = RocksStore::open(dir.path()).unwrap();
    store.set(keys::TOKEN, "abc").unwrap();
    store.set(keys::ROLE, "citizen").unwrap();

    let navigator = Arc::new(RecordingNavigator::new());
    let gateway = SessionGateway::new(
        Arc::new(store),
        HttpTransport::new(Duration::from_secs(5)).unwrap(),
        navigator,
        GatewayConfig {
            // Nothing listens on port 1.
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..GatewayConfig::default()
        },
    );

    let err = gateway
        .dispatch_authenticated(ApiRequest::get("/api/citizen/reports"))
        .await
        .unwrap_err();

    assert!(matches!(err, roadwatch_gateway::GatewayError::Transport(_)));
    assert!(gateway.has_session());
}

/// A status line and headers promising 100 bytes, followed by only three.
const TRUNCATED_401: &str = "HTTP/1.1 401 Unauthorized\r\nContent-Length: 100\r\n\r\nabc";
const TRUNCATED_200: &str = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nabc";

/// Answer every connection with `response`, then close it.
///
/// Returns the base URL and a counter of accepted connections.
async fn serve_raw(response: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            read_request(&mut socket).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), hits)
}

/// Drain one request: headers plus `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
    }
}

fn memory_gateway(
    base_url: String,
) -> (
    SessionGateway<MemoryStore, HttpTransport, RecordingNavigator>,
    Arc<MemoryStore>,
    Arc<RecordingNavigator>,
) {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::TOKEN, "abc").unwrap();
    store.set(keys::ROLE, "citizen").unwrap();
    store.set(keys::USER_NAME, "Test Citizen").unwrap();

    let navigator = Arc::new(RecordingNavigator::new());
    let gateway = SessionGateway::new(
        Arc::clone(&store),
        HttpTransport::new(Duration::from_secs(5)).unwrap(),
        Arc::clone(&navigator),
        GatewayConfig {
            api_base_url: base_url,
            ..GatewayConfig::default()
        },
    );
    (gateway, store, navigator)
}

#[tokio::test]
async fn truncated_body_still_yields_the_response() {
    let (base_url, hits) = serve_raw(TRUNCATED_200).await;
    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

    let response = transport
        .send(&ApiRequest::get(format!("{base_url}/api/citizen/reports")))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn truncated_unauthorized_ends_session_without_retry() {
    let (base_url, hits) = serve_raw(TRUNCATED_401).await;
    let (gateway, store, navigator) = memory_gateway(base_url);

    let response = gateway
        .dispatch_authenticated(ApiRequest::get("/api/citizen/reports"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(store.is_empty());
    assert_eq!(navigator.redirects(), vec!["/index.html".to_string()]);
}

#[tokio::test]
async fn truncated_success_is_not_resent() {
    let (base_url, hits) = serve_raw(TRUNCATED_200).await;
    let (gateway, store, navigator) = memory_gateway(base_url);

    let request = ApiRequest::post("/api/citizen/reports")
        .json(&serde_json::json!({ "severity": "high" }))
        .unwrap();
    let response = gateway.dispatch_authenticated(request).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.len(), 3);
    assert!(navigator.is_idle());
}
