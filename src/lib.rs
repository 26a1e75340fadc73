//! Surplus food tracking: providers donate listings, receivers claim them,
//! and a fixed catalogue of reports summarizes the activity.
//!
//! All state lives in one SQLite database reached through an injected
//! [`infra::DbPool`]. Presentation layers call [`app`] directly or go through
//! the JSON [`commands::dispatch`] boundary.

pub mod app;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

pub use config::AppConfig;
pub use error::AppError;
pub use infra::{init_db, DbPool};
