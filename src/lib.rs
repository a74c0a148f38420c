//! # Flyspray
//!
//! A bug tracking backend, usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! flyspray = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flyspray::config::Config;
//! use flyspray::server::{AppState, create_router};
//! use flyspray::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/flyspray.db").unwrap();
//! store.migrate().unwrap();
//!
//! let mut config = Config::default();
//! config.jwt.secret = std::env::var("FLYSPRAY_JWT_SECRET").unwrap();
//! config.validate().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), &config));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `flyspray` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
