//! Access-level extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose access level
//! is below the minimum, so handlers enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use monitor_core::error::CoreError;
use monitor_core::roles::UserType;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `user` access level or higher. Guests get 403 Forbidden.
///
/// ```ignore
/// async fn dashboards(RequireUser(user): RequireUser) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireUser(pub AuthUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.user_type < UserType::User {
            tracing::debug!(user_id = user.user_id, "Guest session denied");
            return Err(AppError::Core(CoreError::no_permissions()));
        }
        Ok(RequireUser(user))
    }
}

/// Requires any authenticated session, guests included.
///
/// Equivalent to [`AuthUser`], named for routes whose only requirement is
/// "signed in".
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
