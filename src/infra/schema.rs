//! Schema provisioning: versioned migrations and one-time bulk load.

use super::bulk_load::{self, TABLES};
use super::db::{get_connection, DbPool};
use super::legacy;
use crate::error::AppError;
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use std::path::Path;

enum Migration {
    Sql(&'static str),
    /// Data rewrite that cannot be expressed in SQL alone.
    Rows(fn(&Transaction<'_>) -> Result<(), AppError>),
}

const MIGRATIONS: &[(i32, Migration)] = &[
    (1, Migration::Sql(include_str!("../../migrations/0001_init.sql"))),
    (2, Migration::Rows(legacy::normalize_stored_rows)),
];

/// Outcome of one table's bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct TableLoad {
    pub table: String,
    pub inserted: usize,
    pub skipped: usize,
    /// Set when the file could not be read at all; the table stays empty.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InitReport {
    pub applied_migrations: Vec<i32>,
    pub loaded: Vec<TableLoad>,
}

/// Apply pending migrations in a single transaction. Returns the versions applied.
///
/// Any failure rolls back every migration of this call.
pub fn apply_migrations(conn: &mut Connection) -> Result<Vec<i32>, AppError> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Schema(e.to_string()))?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL DEFAULT (datetime('now')))",
        [],
    )
    .map_err(|e| AppError::Schema(e.to_string()))?;

    let applied: Vec<i32> = tx
        .prepare("SELECT version FROM schema_migrations ORDER BY version")
        .map_err(|e| AppError::Schema(e.to_string()))?
        .query_map([], |r| r.get(0))
        .map_err(|e| AppError::Schema(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Schema(e.to_string()))?;

    let mut newly_applied = Vec::new();
    for (version, migration) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }
        match migration {
            Migration::Sql(sql) => tx
                .execute_batch(sql)
                .map_err(|e| AppError::Schema(format!("migration {}: {}", version, e)))?,
            Migration::Rows(rewrite) => rewrite(&tx).map_err(|e| match e {
                AppError::Schema(msg) => AppError::Schema(format!("migration {}: {}", version, msg)),
                other => AppError::Schema(format!("migration {}: {}", version, other)),
            })?,
        }
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, datetime('now'))",
            [version],
        )
        .map_err(|e| AppError::Schema(e.to_string()))?;
        newly_applied.push(*version);
    }

    tx.commit().map_err(|e| AppError::Schema(e.to_string()))?;
    Ok(newly_applied)
}

fn row_count(conn: &Connection, table: &str) -> Result<i64, AppError> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .map_err(|e| AppError::Schema(e.to_string()))
}

/// Ensure the schema exists, then bulk-load every empty table that has a data file.
///
/// Safe to call on every start: existing rows are never touched, and a table
/// that already holds data is never loaded again.
pub fn initialize(pool: &DbPool, data_dir: Option<&Path>) -> Result<InitReport, AppError> {
    let mut conn = get_connection(pool);
    let applied_migrations = apply_migrations(&mut conn)?;
    if !applied_migrations.is_empty() {
        log::info!("applied migrations {:?}", applied_migrations);
    }

    let mut loaded = Vec::new();
    let Some(dir) = data_dir else {
        return Ok(InitReport {
            applied_migrations,
            loaded,
        });
    };

    // Parents first so foreign keys in later files resolve.
    for spec in TABLES {
        if row_count(&conn, spec.name)? > 0 {
            continue;
        }
        let path = dir.join(spec.file_name());
        if !path.is_file() {
            log::debug!("no seed file for {} at {:?}", spec.name, path);
            continue;
        }
        let load = match bulk_load::load_table(&mut conn, spec, &path) {
            Ok(load) => load,
            Err(e) => {
                log::error!("error loading data for {}: {}", spec.name, e);
                TableLoad {
                    table: spec.name.to_string(),
                    inserted: 0,
                    skipped: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        loaded.push(load);
    }

    Ok(InitReport {
        applied_migrations,
        loaded,
    })
}
