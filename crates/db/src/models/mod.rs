//! Row models.
//!
//! Each submodule holds the `FromRow` structs for one table family and the
//! conversions into `monitor_core` domain types.

pub mod dashboard;
pub mod user;
pub mod widget;
