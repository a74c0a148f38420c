mod server;

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub use server::{DatabaseConfig, JwtConfig, ServerConfig, VerificationConfig};

use crate::error::{Error, Result};

/// Environment variable that overrides `jwt.secret`.
pub const JWT_SECRET_ENV: &str = "FLYSPRAY_JWT_SECRET";

const MIN_ACCESS_TTL_MINUTES: i64 = 5;
const MIN_SECRET_LEN: usize = 16;
const PLACEHOLDER_SECRETS: [&str; 3] = ["change-me", "changeme", "secret"];

/// Upper bound for `jwt.access_ttl_minutes` (one day).
pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
/// Upper bound for `jwt.refresh_ttl_hours` (one year).
pub const MAX_REFRESH_TTL_HOURS: i64 = 365 * 24;
/// Upper bound for `verification.code_ttl_minutes` (one week).
pub const MAX_CODE_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub verification: VerificationConfig,
}

impl Config {
    /// Reads a TOML configuration file. Missing sections and keys keep
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            if !secret.is_empty() {
                self.jwt.secret = secret;
            }
        }
        self
    }

    /// Checks the settings needed to open the database.
    pub fn validate_database(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(Error::Config("database.path cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Checks every setting the server needs.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host cannot be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("server.port cannot be 0".to_string()));
        }
        if let Some(origin) = self
            .server
            .cors_origins
            .iter()
            .find(|o| !o.starts_with("http://") && !o.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "server.cors_origins entry {origin:?} must start with http:// or https://"
            )));
        }
        self.validate_database()?;
        self.validate_secret()?;
        let access_ttl = self.jwt.access_ttl_minutes;
        if !(MIN_ACCESS_TTL_MINUTES..=MAX_ACCESS_TTL_MINUTES).contains(&access_ttl) {
            return Err(Error::Config(format!(
                "jwt.access_ttl_minutes must be between {MIN_ACCESS_TTL_MINUTES} and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.jwt.refresh_ttl_hours) {
            return Err(Error::Config(format!(
                "jwt.refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        if !(1..=MAX_CODE_TTL_MINUTES).contains(&self.verification.code_ttl_minutes) {
            return Err(Error::Config(format!(
                "verification.code_ttl_minutes must be between 1 and {MAX_CODE_TTL_MINUTES}"
            )));
        }
        Ok(())
    }

    fn validate_secret(&self) -> Result<()> {
        let secret = &self.jwt.secret;
        if secret.is_empty() {
            return Err(Error::Config(format!(
                "jwt.secret is not set; configure it or set {JWT_SECRET_ENV}"
            )));
        }
        if PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
            return Err(Error::Config(
                "jwt.secret is a placeholder value; choose a random secret".to_string(),
            ));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config(format!(
                "jwt.secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(())
    }
}
