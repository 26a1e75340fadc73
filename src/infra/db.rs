//! SQLite connection handle shared by the repository and analytics layers.

use crate::config::AppConfig;
use crate::error::{is_interrupted, AppError};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::schema::{apply_migrations, initialize};

/// VM instructions between deadline checks while a bounded read runs.
const PROGRESS_OPS: i32 = 1_000;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage handle injected into every repository and report call.
///
/// The connection is serialized behind a mutex; each operation holds it for a
/// single statement and releases it before returning.
pub struct DbPool {
    conn: Mutex<Connection>,
    report_timeout: Duration,
}

impl DbPool {
    pub fn new(conn: Connection, report_timeout: Duration) -> Self {
        Self {
            conn: Mutex::new(conn),
            report_timeout,
        }
    }

    pub fn report_timeout(&self) -> Duration {
        self.report_timeout
    }
}

/// Open the database file and enable foreign keys. Does not touch the schema.
pub fn open_db(db_path: &Path, report_timeout: Duration) -> Result<DbPool, AppError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AppError::Connection(e.to_string()))?;
    }
    let conn = Connection::open(db_path).map_err(|e| AppError::Connection(e.to_string()))?;
    configure(&conn, true)?;
    Ok(DbPool::new(conn, report_timeout))
}

pub fn open_in_memory(report_timeout: Duration) -> Result<DbPool, AppError> {
    let conn = Connection::open_in_memory().map_err(|e| AppError::Connection(e.to_string()))?;
    configure(&conn, false)?;
    Ok(DbPool::new(conn, report_timeout))
}

fn configure(conn: &Connection, on_disk: bool) -> Result<(), AppError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| AppError::Connection(e.to_string()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| AppError::Connection(e.to_string()))?;
    if on_disk {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))
            .map_err(|e| AppError::Connection(e.to_string()))?;
        log::debug!("journal_mode={}", mode);
    }
    Ok(())
}

/// Open the configured database, apply the schema and run any pending bulk load.
pub fn init_db(config: &AppConfig) -> Result<DbPool, AppError> {
    log::info!("DB path: {:?}", config.db_path);
    let pool = open_db(&config.db_path, config.report_timeout)?;
    let report = initialize(&pool, config.data_dir.as_deref())?;
    for load in &report.loaded {
        log::info!(
            "bulk load {}: {} inserted, {} skipped",
            load.table,
            load.inserted,
            load.skipped
        );
    }
    Ok(pool)
}

/// In-memory database with the schema applied and nothing loaded. For tests.
pub fn init_test_db() -> DbPool {
    let pool = open_in_memory(crate::config::DEFAULT_REPORT_TIMEOUT).expect("open in-memory db");
    {
        let mut conn = get_connection(&pool);
        apply_migrations(&mut conn).expect("apply migrations");
    }
    pool
}

/// Get connection from pool. A panic in another holder does not poison the store.
pub fn get_connection(pool: &DbPool) -> MutexGuard<'_, Connection> {
    pool.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run a read under a deadline; SQLite interrupts the statement once it passes.
pub(crate) fn run_bounded<T, F>(conn: &Connection, timeout: Duration, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let deadline = Instant::now() + timeout;
    conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));
    let result = f(conn);
    conn.progress_handler(0, None::<fn() -> bool>);
    result.map_err(|e| {
        if is_interrupted(&e) {
            AppError::Timeout(timeout.as_millis())
        } else {
            e.into()
        }
    })
}
