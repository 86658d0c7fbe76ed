//! Dashboard resolution rules, ownership and access.
//!
//! The dashboard page can show a blank new dashboard, a clone of another
//! dashboard, or a stored one picked explicitly or from the user's last
//! visit. [`select_dashboard`] decides which, before anything is loaded.

use serde::Serialize;

use crate::roles::{Caller, UserType};
use crate::types::{DbId, UNSET_ID};
use crate::widget::RawWidget;

/// Owner name shown when the owning user cannot be resolved.
pub const INACCESSIBLE_USER: &str = "Inaccessible user";

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Dashboard-identifying request parameters.
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    pub new: bool,
    pub source_dashboardid: Option<DbId>,
    pub dashboardid: Option<DbId>,
}

/// What the request asks the page to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSelector {
    /// A blank, unsaved dashboard.
    New,
    /// An unsaved copy of the given dashboard.
    Clone(DbId),
    /// A stored dashboard.
    Existing(DbId),
    /// Nothing to show; the caller should be sent to the dashboard list.
    Nothing,
}

/// Decide which dashboard to show. First match wins: `new`, then a clone
/// source, then an explicit id, the remembered id, or `default_id`.
///
/// `default_id` only applies while the user has never opened the dashboard
/// list; after that an empty selection means "show the list".
pub fn select_dashboard(
    request: &DashboardRequest,
    remembered_id: DbId,
    list_was_opened: bool,
    default_id: DbId,
) -> DashboardSelector {
    if request.new {
        return DashboardSelector::New;
    }
    if let Some(source) = request.source_dashboardid {
        return DashboardSelector::Clone(source);
    }

    let mut dashboardid = request.dashboardid.unwrap_or(remembered_id);
    if dashboardid == UNSET_ID && !list_was_opened {
        dashboardid = default_id;
    }

    if dashboardid == UNSET_ID {
        DashboardSelector::Nothing
    } else {
        DashboardSelector::Existing(dashboardid)
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: DbId,
    pub name: String,
}

impl Owner {
    /// Placeholder owner for a user id that did not resolve.
    pub fn inaccessible(id: DbId) -> Self {
        Self {
            id,
            name: INACCESSIBLE_USER.to_string(),
        }
    }
}

/// Display name for a user: `alias` alone, or `alias (name surname)` when
/// either personal name is set.
pub fn user_full_name(alias: &str, name: &str, surname: &str) -> String {
    let personal = [name.trim(), surname.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if personal.is_empty() {
        alias.to_string()
    } else {
        format!("{alias} ({personal})")
    }
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Permission granted by a dashboard share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum SharePermission {
    Read = 2,
    ReadWrite = 3,
}

impl SharePermission {
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            2 => Some(SharePermission::Read),
            3 => Some(SharePermission::ReadWrite),
            _ => None,
        }
    }
}

/// The facts needed to decide whether a caller may see or edit a dashboard.
#[derive(Debug, Clone, Copy)]
pub struct DashboardAccess {
    pub owner_id: DbId,
    pub private: bool,
    /// The caller's own share on the dashboard, if any.
    pub share: Option<SharePermission>,
}

impl DashboardAccess {
    pub fn is_visible_to(&self, caller: &Caller) -> bool {
        caller.user_type == UserType::SuperAdmin
            || caller.user_id == self.owner_id
            || !self.private
            || self.share.is_some()
    }

    pub fn is_editable_by(&self, caller: &Caller) -> bool {
        caller.user_type == UserType::SuperAdmin
            || caller.user_id == self.owner_id
            || self.share == Some(SharePermission::ReadWrite)
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// A dashboard ready for the page, stored or synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// `0` for a dashboard that has not been saved.
    pub dashboardid: DbId,
    pub name: String,
    pub editable: bool,
    pub owner: Owner,
    /// Raw widgets; the page receives them normalized as `grid_widgets`.
    #[serde(skip)]
    pub widgets: Vec<RawWidget>,
}

impl DashboardView {
    /// A blank dashboard owned by the caller.
    pub fn new_for(owner: Owner) -> Self {
        Self {
            dashboardid: UNSET_ID,
            name: String::new(),
            editable: true,
            owner,
            widgets: Vec::new(),
        }
    }

    /// An unsaved copy of another dashboard, owned by the caller.
    pub fn cloned_from(name: String, widgets: Vec<RawWidget>, owner: Owner) -> Self {
        Self {
            name,
            widgets,
            ..Self::new_for(owner)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
