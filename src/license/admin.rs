use std::str::FromStr;

use crate::db::LicenseStore;
use crate::error::{AppError, Result};
use crate::keygen::KeyGenerator;
use crate::models::{DurationCode, LicenseRecord, NewLicense};

/// Attempts at finding an unused key before giving up.
pub const MAX_KEY_ATTEMPTS: u32 = 5;

pub fn parse_duration(code: &str) -> Result<DurationCode> {
    DurationCode::from_str(code).map_err(|_| AppError::UnrecognizedDuration(code.to_string()))
}

/// Issue a new, unbound license for the given duration code.
///
/// Key collisions are retried with a fresh key up to [`MAX_KEY_ATTEMPTS`]
/// times.
pub fn issue<S, G>(store: &S, keygen: &G, duration: &str, now: i64) -> Result<LicenseRecord>
where
    S: LicenseStore + ?Sized,
    G: KeyGenerator + ?Sized,
{
    let duration = parse_duration(duration)?;

    for attempt in 1..=MAX_KEY_ATTEMPTS {
        let input = NewLicense {
            key: keygen.generate(),
            expiration_minutes: duration.minutes(),
            created_at: now,
        };

        match store.insert(&input) {
            Ok(license) => {
                tracing::info!(
                    "Issued license {} ({} minutes)",
                    license.id,
                    license.expiration_minutes
                );
                return Ok(license);
            }
            Err(AppError::DuplicateKey) => {
                tracing::warn!("Key collision on attempt {}, regenerating", attempt);
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::KeyspaceExhausted(MAX_KEY_ATTEMPTS))
}

/// Delete a license. Revoking an unknown id is a no-op.
pub fn revoke<S: LicenseStore + ?Sized>(store: &S, id: i64) -> Result<()> {
    if store.delete(id)? {
        tracing::info!("Revoked license {}", id);
    }
    Ok(())
}

/// Release a license's device binding so another device can claim it.
pub fn unbind<S: LicenseStore + ?Sized>(store: &S, id: i64) -> Result<LicenseRecord> {
    let mut license = store
        .find_by_id(id)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    let previous = license.device_id.take();
    license.is_logged_in = false;
    store.update(&license)?;

    tracing::info!("Unbound license {} (was {:?})", id, previous);
    Ok(license)
}
