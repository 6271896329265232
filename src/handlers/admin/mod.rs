mod keys;
mod listing;

pub use keys::*;
pub use listing::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_page))
        .route("/generate-key", post(generate_key))
        .route("/delete_key/{id}", post(delete_key))
        .route("/unbind_key/{id}", post(unbind_key))
}
