//! Domain error type shared by the repository and HTTP layers.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist or is not visible to the caller.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// No session, or the session token could not be verified.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session is valid but its access level is too low for the request.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The denial returned when an explicitly referenced object is missing or hidden.
    ///
    /// Both cases share one message so callers cannot probe for ids they may not see.
    pub fn no_permissions() -> Self {
        CoreError::Forbidden("No permissions to referred object or it does not exist".into())
    }
}
