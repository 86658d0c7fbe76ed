pub mod dashboard;
pub mod health;
pub mod media_type;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard/view                          dashboard page (GET, user)
/// /dashboards                              dashboard list (GET, user)
/// /dashboards/widgets/{id}/rf-rate         widget refresh rate (PUT, user)
///
/// /media-types/message-template            message template editor (POST, auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::page_router())
        .nest("/dashboards", dashboard::list_router())
        .nest("/media-types", media_type::router())
}
