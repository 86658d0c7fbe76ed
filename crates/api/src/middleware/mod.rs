//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireUser`] -- Requires at least the `user` access level.
//! - [`rbac::RequireAuth`] -- Requires any authenticated session, guests included.

pub mod auth;
pub mod rbac;
