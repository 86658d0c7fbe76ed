//! Request handlers.
//!
//! Handlers delegate decisions to `monitor_core`, data access to the
//! repositories in `monitor_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod dashboard;
pub mod media_type;
