use std::fmt::Write;

use axum::{extract::State, response::Html};
use strum::IntoEnumIterator;

use crate::db::AppState;
use crate::error::Result;
use crate::models::{DurationCode, LicenseRecord};
use crate::util::{escape_html, now, to_display};

/// GET /admin
/// Read-only listing of every license with its computed expiry.
pub async fn admin_page(State(state): State<AppState>) -> Result<Html<String>> {
    let licenses = state.store.list_all()?;
    Ok(Html(render_admin_page(&licenses, now())))
}

pub fn render_admin_page(licenses: &[LicenseRecord], now: i64) -> String {
    let mut options = String::new();
    for code in DurationCode::iter() {
        let _ = write!(
            options,
            r#"<option value="{}">{}</option>"#,
            code.as_ref(),
            code.label()
        );
    }

    let mut rows = String::new();
    for license in licenses {
        let status = if license.is_expired(now) {
            "Expired"
        } else {
            "Active"
        };
        let device = match (&license.device_id, license.is_logged_in) {
            (Some(device), true) => escape_html(device),
            _ => "-".to_string(),
        };
        let unbind = if license.is_logged_in {
            format!(
                r#"<form method="post" action="/unbind_key/{}" style="display:inline"><button type="submit">Unbind</button></form>"#,
                license.id
            )
        } else {
            String::new()
        };

        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td><code>{}</code></td><td>{} min</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}<form method="post" action="/delete_key/{}" style="display:inline"><button type="submit">Delete</button></form></td></tr>"#,
            license.id,
            escape_html(&license.key),
            license.expiration_minutes,
            to_display(license.created_at),
            to_display(license.expires_at()),
            status,
            device,
            unbind,
            license.id,
        );
    }

    if licenses.is_empty() {
        rows.push_str(r#"<tr><td colspan="8">No license keys issued yet.</td></tr>"#);
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>License Keys</title></head>
<body style="font-family: sans-serif; margin: 24px;">
<h1>License Keys</h1>
<form method="post" action="/generate-key">
<label for="duration">Duration</label>
<select id="duration" name="duration">{}</select>
<button type="submit">Generate Key</button>
</form>
<table border="1" cellpadding="6" style="border-collapse: collapse; margin-top: 16px;">
<thead><tr><th>ID</th><th>Key</th><th>Duration</th><th>Created</th><th>Expires</th><th>Status</th><th>Device</th><th>Actions</th></tr></thead>
<tbody>{}</tbody>
</table>
</body>
</html>"#,
        options, rows
    )
}
