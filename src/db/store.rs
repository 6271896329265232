//! Repository interface over license records.
//!
//! The validation and admin operations only see [`LicenseStore`]; the SQLite
//! implementation maps each call onto the queries in [`super::queries`].

use crate::error::Result;
use crate::models::{BindOutcome, LicenseRecord, NewLicense};

use super::{DbPool, queries};

pub trait LicenseStore: Send + Sync {
    /// Fails with `DuplicateKey` when the key already exists.
    fn insert(&self, input: &NewLicense) -> Result<LicenseRecord>;

    fn find_by_key(&self, key: &str) -> Result<Option<LicenseRecord>>;

    fn find_by_id(&self, id: i64) -> Result<Option<LicenseRecord>>;

    /// Persist `is_logged_in` and `device_id`. Fails with `NotFound` if the
    /// record was deleted.
    fn update(&self, license: &LicenseRecord) -> Result<()>;

    /// Returns whether a record was removed. Absent ids are not an error.
    fn delete(&self, id: i64) -> Result<bool>;

    fn list_all(&self) -> Result<Vec<LicenseRecord>>;

    /// Bind `device_id` unless another device already holds the license.
    /// The check and the write happen atomically.
    fn bind_device(&self, id: i64, device_id: &str) -> Result<BindOutcome>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LicenseStore for SqliteStore {
    fn insert(&self, input: &NewLicense) -> Result<LicenseRecord> {
        let conn = self.pool.get()?;
        queries::create_license(&conn, input)
    }

    fn find_by_key(&self, key: &str) -> Result<Option<LicenseRecord>> {
        let conn = self.pool.get()?;
        queries::get_license_by_key(&conn, key)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<LicenseRecord>> {
        let conn = self.pool.get()?;
        queries::get_license_by_id(&conn, id)
    }

    fn update(&self, license: &LicenseRecord) -> Result<()> {
        let conn = self.pool.get()?;
        queries::update_license_binding(&conn, license)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        queries::delete_license(&conn, id)
    }

    fn list_all(&self) -> Result<Vec<LicenseRecord>> {
        let conn = self.pool.get()?;
        queries::list_licenses(&conn)
    }

    fn bind_device(&self, id: i64, device_id: &str) -> Result<BindOutcome> {
        let mut conn = self.pool.get()?;
        queries::bind_device_atomic(&mut conn, id, device_id)
    }
}
