use crate::db::LicenseStore;
use crate::error::{AppError, Result};
use crate::models::{BindOutcome, LicenseRecord};

/// A successful validation: the license, now bound to the caller's device.
#[derive(Debug, Clone)]
pub struct Validated {
    pub license: LicenseRecord,
    pub expires_at: i64,
}

/// Validate `key` for `device_id` at unix time `now`, binding the device on
/// first use.
///
/// Checks run in a fixed order and the first failure wins: missing key,
/// unknown key, expiry, missing device id, then device conflict. Expired records are left
/// untouched. A device that already holds the binding can validate again
/// as often as it likes.
pub fn validate<S>(store: &S, key: &str, device_id: &str, now: i64) -> Result<Validated>
where
    S: LicenseStore + ?Sized,
{
    if key.is_empty() {
        return Err(AppError::MissingKey);
    }
    let license = store.find_by_key(key)?.ok_or(AppError::InvalidKey)?;

    let expires_at = license.expires_at();
    if license.is_expired(now) {
        return Err(AppError::Expired);
    }

    if device_id.is_empty() {
        return Err(AppError::MissingDeviceId);
    }

    if license.is_held_by_other(device_id) {
        tracing::warn!(
            "License {} rejected for device {}: held by another device",
            license.id,
            device_id
        );
        return Err(AppError::DeviceConflict);
    }

    let was_bound = license.is_logged_in;

    // The snapshot above may be stale; the store re-checks under its lock.
    match store.bind_device(license.id, device_id) {
        Ok(BindOutcome::Bound(license)) => {
            if !was_bound {
                tracing::info!("License {} bound to device {}", license.id, device_id);
            }
            Ok(Validated {
                license,
                expires_at,
            })
        }
        Ok(BindOutcome::Conflict { .. }) => {
            tracing::warn!(
                "License {} lost bind race for device {}",
                license.id,
                device_id
            );
            Err(AppError::DeviceConflict)
        }
        // Revoked between lookup and bind
        Err(AppError::NotFound(_)) => Err(AppError::InvalidKey),
        Err(e) => Err(e),
    }
}
