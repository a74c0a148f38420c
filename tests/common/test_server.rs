use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use flyspray::auth::VerificationNotifier;
use flyspray::config::Config;
use flyspray::server::{AppState, create_router};
use flyspray::store::{SqliteStore, Store};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Remembers the latest code handed out per email address.
#[derive(Default)]
pub struct RecordingNotifier {
    codes: Mutex<HashMap<String, i64>>,
}

impl VerificationNotifier for RecordingNotifier {
    fn send_code(&self, email: &str, code: i64) -> flyspray::error::Result<()> {
        self.codes
            .lock()
            .unwrap()
            .insert(email.to_string(), code);
        Ok(())
    }
}

/// Signing key used by every test server.
pub const TEST_SECRET: &str = "flyspray-test-secret-0123456789";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.jwt.secret = TEST_SECRET.to_string();
    config
}

/// Drives the router in-process against a throwaway database file.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub state: Arc<AppState>,
    notifier: Arc<RecordingNotifier>,
    router: Router,
}

impl TestServer {
    pub fn start() -> Self {
        Self::with_config(&test_config())
    }

    pub fn with_config(config: &Config) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("flyspray.db")).expect("open store");
        store.migrate().expect("migrate");

        let notifier = Arc::new(RecordingNotifier::default());
        let state = Arc::new(
            AppState::new(Arc::new(store), config).with_notifier(notifier.clone()),
        );
        let router = create_router(state.clone());

        Self {
            temp_dir,
            state,
            notifier,
            router,
        }
    }

    pub fn code_for(&self, email: &str) -> Option<i64> {
        self.notifier.codes.lock().unwrap().get(email).copied()
    }

    /// Sends a prepared request and hands back the raw response.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.request(request).await;

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string()), None)
            .await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body.to_string()), None)
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }
}
