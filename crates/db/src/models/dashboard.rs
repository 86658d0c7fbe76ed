//! Dashboard entity models.

use monitor_core::dashboard::{user_full_name, DashboardAccess, Owner, SharePermission};
use monitor_core::roles::Caller;
use monitor_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A `dashboards` row joined with the caller's own share, if any.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardRow {
    pub id: DbId,
    pub name: String,
    pub user_id: DbId,
    pub private: bool,
    pub share_permission: Option<i16>,
}

impl DashboardRow {
    pub fn access(&self) -> DashboardAccess {
        DashboardAccess {
            owner_id: self.user_id,
            private: self.private,
            share: self.share_permission.and_then(SharePermission::from_id),
        }
    }
}

/// A dashboard list row with the owner's names pulled in.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardListRow {
    pub id: DbId,
    pub name: String,
    pub user_id: DbId,
    pub private: bool,
    pub share_permission: Option<i16>,
    pub owner_alias: Option<String>,
    pub owner_name: Option<String>,
    pub owner_surname: Option<String>,
}

/// Dashboard list entry returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardListItem {
    pub dashboardid: DbId,
    pub name: String,
    pub owner: Owner,
    pub editable: bool,
}

impl DashboardListRow {
    pub fn into_item(self, caller: &Caller) -> DashboardListItem {
        let access = DashboardAccess {
            owner_id: self.user_id,
            private: self.private,
            share: self.share_permission.and_then(SharePermission::from_id),
        };

        let owner = match self.owner_alias {
            Some(alias) => Owner {
                id: self.user_id,
                name: user_full_name(
                    &alias,
                    self.owner_name.as_deref().unwrap_or_default(),
                    self.owner_surname.as_deref().unwrap_or_default(),
                ),
            },
            None => Owner::inaccessible(self.user_id),
        };

        DashboardListItem {
            dashboardid: self.id,
            name: self.name,
            owner,
            editable: access.is_editable_by(caller),
        }
    }
}
