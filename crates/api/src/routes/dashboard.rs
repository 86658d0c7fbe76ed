//! Route definitions for dashboards.
//!
//! Guests are refused on every route.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard page routes mounted at `/dashboard`.
///
/// ```text
/// GET  /view   -> view_dashboard
/// ```
pub fn page_router() -> Router<AppState> {
    Router::new().route("/view", get(dashboard::view_dashboard))
}

/// Dashboard collection routes mounted at `/dashboards`.
///
/// ```text
/// GET  /                        -> list_dashboards
/// PUT  /widgets/{id}/rf-rate    -> update_widget_rf_rate
/// ```
pub fn list_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::list_dashboards))
        .route("/widgets/{id}/rf-rate", put(dashboard::update_widget_rf_rate))
}
