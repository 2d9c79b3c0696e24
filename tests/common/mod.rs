//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use routing_gateway::{GatewayConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Token the mock auth service accepts.
pub const GOOD_TOKEN: &str = "good";
/// Customer id the mock auth service resolves for [`GOOD_TOKEN`].
pub const CUSTOMER: &str = "C1";

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned answer from a mock backend.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap();
        let mut response = (status, self.body).into_response();
        for (name, value) in self.headers {
            response.headers_mut().insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(&value).unwrap(),
            );
        }
        response
    }
}

type Responder = dyn Fn(&Recorded) -> MockResponse + Send + Sync;

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<Recorded>>>,
    respond: Arc<Responder>,
}

/// A running mock backend that records every request it receives.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_backend<F>(respond: F) -> MockBackend
where
    F: Fn(&Recorded) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        calls: calls.clone(),
        respond: Arc::new(respond),
    };
    let app = Router::new().fallback(record).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, calls }
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let recorded = Recorded {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };

    let reply = (state.respond)(&recorded);
    state.calls.lock().unwrap().push(recorded);
    reply.into_response()
}

/// Start a backend answering every request with a fixed response.
pub async fn start_fixed_backend(status: u16, body: &'static str) -> MockBackend {
    start_backend(move |_| MockResponse::new(status, body)).await
}

/// Mock login service.
///
/// `POST /auth` accepts `Bearer good` and answers with a `customerId` header.
/// `POST /login` accepts alice/secret and answers with a token body.
pub async fn start_auth_backend() -> MockBackend {
    start_backend(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/auth") => {
            let authorization = req.headers.get("authorization").and_then(|v| v.to_str().ok());
            if authorization == Some(format!("Bearer {}", GOOD_TOKEN).as_str()) {
                MockResponse::new(200, "").header("customerId", CUSTOMER)
            } else {
                MockResponse::new(401, "invalid token")
            }
        }
        ("POST", "/login") => {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap_or_default();
            if body["username"] == "alice" && body["password"] == "secret" {
                MockResponse::new(200, format!(r#"{{"token":"{}"}}"#, GOOD_TOKEN))
                    .header("content-type", "application/json")
                    .header("customerId", CUSTOMER)
            } else {
                MockResponse::new(401, "bad credentials")
            }
        }
        _ => MockResponse::new(404, "not found"),
    })
    .await
}

/// Address that refuses connections.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// One mock per backend service.
pub struct Backends {
    pub login: MockBackend,
    pub customer: MockBackend,
    pub mortgage: MockBackend,
    pub product: MockBackend,
    pub debit_instruction: MockBackend,
}

impl Backends {
    /// Auth mock plus business backends that answer 200 with their name.
    pub async fn start() -> Self {
        Self {
            login: start_auth_backend().await,
            customer: start_fixed_backend(200, r#"{"service":"customer"}"#).await,
            mortgage: start_fixed_backend(200, r#"{"service":"mortgage"}"#).await,
            product: start_fixed_backend(200, r#"{"service":"product"}"#).await,
            debit_instruction: start_fixed_backend(200, r#"{"service":"debit_instruction"}"#).await,
        }
    }

    pub fn config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.services.login = self.login.url();
        config.services.customer = self.customer.url();
        config.services.mortgage = self.mortgage.url();
        config.services.product = self.product.url();
        config.services.debit_instruction = self.debit_instruction.url();
        config
    }

    pub fn total_calls(&self) -> usize {
        [
            &self.login,
            &self.customer,
            &self.mortgage,
            &self.product,
            &self.debit_instruction,
        ]
        .iter()
        .map(|b| b.call_count())
        .sum()
    }
}

/// A gateway running on an ephemeral port; shut down on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
