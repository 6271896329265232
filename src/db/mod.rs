mod from_row;
pub mod queries;
mod store;

pub use from_row::*;
pub use store::*;

use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::keygen::{KeyGenerator, UuidKeyGenerator};

pub type DbPool = Pool<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LicenseStore>,
    pub keygen: Arc<dyn KeyGenerator>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            store: Arc::new(SqliteStore::new(pool)),
            keygen: Arc::new(UuidKeyGenerator),
        }
    }
}

/// Build a pool for a file-backed database. Callers run [`init_db`] on it.
pub fn create_pool(path: &str, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Ok(())
    });
    Pool::builder().max_size(max_size).build(manager)
}

pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS licenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            expiration_minutes INTEGER NOT NULL CHECK (expiration_minutes > 0),
            created_at INTEGER NOT NULL,
            is_logged_in INTEGER NOT NULL DEFAULT 0,
            device_id TEXT,
            CHECK (is_logged_in = 0 OR device_id IS NOT NULL)
        );
        "#,
    )
}
