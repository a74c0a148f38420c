use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};
use chrono::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::account::account_router;
use super::tracker::tracker_router;
use crate::auth::{LogNotifier, PasswordHasher, TokenIssuer, VerificationNotifier};
use crate::config::{Config, MAX_CODE_TTL_MINUTES};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
    pub notifier: Arc<dyn VerificationNotifier>,
    /// Lifetime of a freshly issued signup verification code.
    pub verification_ttl: Duration,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Builds the state from configuration. Codes go to the log until
    /// [`AppState::with_notifier`] installs something else.
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(&config.jwt),
            passwords: PasswordHasher::new(),
            notifier: Arc::new(LogNotifier),
            verification_ttl: Duration::minutes(
                config
                    .verification
                    .code_ttl_minutes
                    .clamp(0, MAX_CODE_TTL_MINUTES),
            ),
            cors_origins: config.server.cors_origins.clone(),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn VerificationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

/// Any origin when `origins` is empty, otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .merge(tracker_router())
        .merge(account_router())
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
