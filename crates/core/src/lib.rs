//! Domain logic for the monitoring frontend request layer.
//!
//! Everything here is pure: no database or HTTP types. The `db` crate loads
//! rows into these types and the `api` crate wires them to requests.

pub mod dashboard;
pub mod error;
pub mod media_type;
pub mod message_template;
pub mod page_filter;
pub mod profile;
pub mod roles;
pub mod types;
pub mod widget;
