//! Infrastructure: SQLite connection, schema, bulk loading.

pub mod bulk_load;
pub mod db;
mod legacy;
pub mod schema;

pub(crate) use db::{get_connection, run_bounded};
pub use db::{init_db, init_test_db, open_db, open_in_memory, DbPool};
pub use schema::{initialize, InitReport, TableLoad};
