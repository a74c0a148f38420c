use thiserror::Error;

use crate::auth::TokenError;
use crate::types::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    /// A UNIQUE constraint rejected the write.
    #[error("duplicate key")]
    DuplicateKey,

    #[error("database schema version {0} is newer than this build supports")]
    UnsupportedSchema(i64),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("token error: {0}")]
    Token(#[from] TokenError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classifies a driver error raised by an INSERT or UPDATE, turning
    /// UNIQUE violations into [`Error::DuplicateKey`].
    pub(crate) fn from_write(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Error::DuplicateKey
            }
            other => Error::Database(other),
        }
    }
}
