//! Stable error codes for callers of the data layer.

use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot open store: {0}")]
    Connection(String),

    #[error("Schema setup failed: {0}")]
    Schema(String),

    #[error("Referenced row does not exist: {0}")]
    Referential(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Query exceeded {0} ms")]
    Timeout(u128),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Db(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Referential(_) => "REFERENTIAL_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Db(_) => "DB_ERROR",
        }
    }

    pub fn to_serde(&self) -> AppErrorDto {
        AppErrorDto {
            code: self.code().to_string(),
            message: self.to_string(),
            details: None,
        }
    }
}

/// True when SQLite rejected a write because a foreign key had no parent row.
pub(crate) fn is_foreign_key_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

pub(crate) fn is_interrupted(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::OperationInterrupted
    )
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        if is_foreign_key_violation(&e) {
            AppError::Referential(e.to_string())
        } else {
            AppError::Db(e.to_string())
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_serde().serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
pub struct AppErrorDto {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
