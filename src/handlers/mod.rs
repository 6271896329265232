pub mod admin;
pub mod public;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::AppState;

/// The full HTTP surface with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(admin::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
