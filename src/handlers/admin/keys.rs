use axum::{extract::State, response::Redirect};
use serde::Deserialize;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Form, Path};
use crate::license;
use crate::models::DurationCode;
use crate::util::now;

#[derive(Debug, Deserialize)]
pub struct GenerateKeyForm {
    /// Duration code; the form's first option when absent
    #[serde(default)]
    pub duration: Option<String>,
}

/// POST /generate-key
pub async fn generate_key(
    State(state): State<AppState>,
    Form(form): Form<GenerateKeyForm>,
) -> Result<Redirect> {
    let duration = form
        .duration
        .unwrap_or_else(|| DurationCode::default().as_ref().to_string());

    license::issue(
        state.store.as_ref(),
        state.keygen.as_ref(),
        &duration,
        now(),
    )?;

    Ok(Redirect::to("/admin"))
}

/// POST /delete_key/{id}
pub async fn delete_key(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    license::revoke(state.store.as_ref(), id)?;
    Ok(Redirect::to("/admin"))
}

/// POST /unbind_key/{id}
/// Release the device binding so the key can be claimed again.
pub async fn unbind_key(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    license::unbind(state.store.as_ref(), id)?;
    Ok(Redirect::to("/admin"))
}
