//! Host group / host selection that pre-populates the dashboard filter.
//!
//! Only monitored hosts that have items are selectable, and groups are
//! offered only when they contain such a host. A requested or remembered id
//! that is not among the options falls back to "not selected" (`0`).

use serde::Serialize;

use crate::types::{DbId, UNSET_ID};

/// One entry of a group or host drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFilter {
    pub groupid: DbId,
    pub hostid: DbId,
    pub groups: Vec<FilterOption>,
    pub hosts: Vec<FilterOption>,
}

/// Pick the selected id: the requested one when given, else the remembered
/// one, kept only if it is a current option.
pub fn resolve_selection(requested: Option<DbId>, remembered: DbId, options: &[FilterOption]) -> DbId {
    let wanted = requested.unwrap_or(remembered);
    if wanted != UNSET_ID && options.iter().any(|o| o.id == wanted) {
        wanted
    } else {
        UNSET_ID
    }
}
