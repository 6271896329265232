use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::license;
use crate::util::{now, to_iso8601};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeyRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateKeyResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// ISO-8601 UTC instant after which the key stops validating
    pub expiry: String,
}

/// POST /validate-key
/// Check a key for a device, binding the device on first use.
pub async fn validate_key(
    State(state): State<AppState>,
    Json(request): Json<ValidateKeyRequest>,
) -> Result<Json<ValidateKeyResponse>> {
    let key = request.key.unwrap_or_default();
    let device_id = request.device_id.unwrap_or_default();

    let validated = license::validate(state.store.as_ref(), &key, &device_id, now())?;

    Ok(Json(ValidateKeyResponse {
        status: "success",
        message: "Key valid",
        expiry: to_iso8601(validated.expires_at),
    }))
}
