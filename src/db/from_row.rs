use rusqlite::{Connection, OptionalExtension, Params, Row};

use crate::error::Result;
use crate::models::LicenseRecord;

pub const LICENSE_COLS: &str =
    "id, key, expiration_minutes, created_at, is_logged_in, device_id";

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl FromRow for LicenseRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(LicenseRecord {
            id: row.get(0)?,
            key: row.get(1)?,
            expiration_minutes: row.get(2)?,
            created_at: row.get(3)?,
            is_logged_in: row.get(4)?,
            device_id: row.get(5)?,
        })
    }
}

pub fn query_one<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

pub fn query_all<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, T::from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
