use axum::routing::post;
use axum::Router;

use crate::handlers::media_type;
use crate::state::AppState;

/// Media type routes mounted at `/media-types`.
///
/// ```text
/// POST /message-template   -> edit_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/message-template", post(media_type::edit_template))
}
