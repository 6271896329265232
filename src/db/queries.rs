use rusqlite::{Connection, TransactionBehavior, ffi, params};

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{LICENSE_COLS, query_all, query_one};

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

// ============ Licenses ============

/// Insert a new, unbound license. Fails with `DuplicateKey` if the key is taken.
pub fn create_license(conn: &Connection, input: &NewLicense) -> Result<LicenseRecord> {
    let inserted = conn.execute(
        "INSERT INTO licenses (key, expiration_minutes, created_at, is_logged_in, device_id)
         VALUES (?1, ?2, ?3, 0, NULL)",
        params![&input.key, input.expiration_minutes, input.created_at],
    );

    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => return Err(AppError::DuplicateKey),
        Err(e) => return Err(e.into()),
    }

    Ok(LicenseRecord {
        id: conn.last_insert_rowid(),
        key: input.key.clone(),
        expiration_minutes: input.expiration_minutes,
        created_at: input.created_at,
        is_logged_in: false,
        device_id: None,
    })
}

pub fn get_license_by_id(conn: &Connection, id: i64) -> Result<Option<LicenseRecord>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE id = ?1", LICENSE_COLS),
        params![id],
    )
}

pub fn get_license_by_key(conn: &Connection, key: &str) -> Result<Option<LicenseRecord>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE key = ?1", LICENSE_COLS),
        params![key],
    )
}

/// All licenses in creation order.
pub fn list_licenses(conn: &Connection) -> Result<Vec<LicenseRecord>> {
    query_all(
        conn,
        &format!("SELECT {} FROM licenses ORDER BY id ASC", LICENSE_COLS),
        [],
    )
}

/// Persist the binding fields of an existing license.
pub fn update_license_binding(conn: &Connection, license: &LicenseRecord) -> Result<()> {
    let updated = conn.execute(
        "UPDATE licenses SET is_logged_in = ?1, device_id = ?2 WHERE id = ?3",
        params![license.is_logged_in, &license.device_id, license.id],
    )?;

    if updated == 0 {
        return Err(AppError::NotFound("License not found".into()));
    }
    Ok(())
}

pub fn delete_license(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM licenses WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Atomically bind a license to a device unless another device holds it.
///
/// Runs the read-check-write inside an IMMEDIATE transaction so two devices
/// racing on a fresh key cannot both observe it unbound. The loser sees the
/// winner's binding and gets `BindOutcome::Conflict`.
pub fn bind_device_atomic(
    conn: &mut Connection,
    license_id: i64,
    device_id: &str,
) -> Result<BindOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let license: LicenseRecord = query_one(
        &tx,
        &format!("SELECT {} FROM licenses WHERE id = ?1", LICENSE_COLS),
        params![license_id],
    )?
    .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    if license.is_held_by_other(device_id) {
        // Nothing written, dropping the transaction rolls back
        return Ok(BindOutcome::Conflict {
            bound_to: license.device_id,
        });
    }

    tx.execute(
        "UPDATE licenses SET is_logged_in = 1, device_id = ?1 WHERE id = ?2",
        params![device_id, license_id],
    )?;
    tx.commit()?;

    Ok(BindOutcome::Bound(LicenseRecord {
        is_logged_in: true,
        device_id: Some(device_id.to_string()),
        ..license
    }))
}
