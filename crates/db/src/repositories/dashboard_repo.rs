//! Repository for the `dashboards` and `dashboard_users` tables.

use monitor_core::roles::{Caller, UserType};
use monitor_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::{DashboardListRow, DashboardRow};

/// Provides reads of dashboards and their shares.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Find a dashboard together with `user_id`'s share on it.
    ///
    /// Visibility is not checked here; see [`DashboardRow::access`].
    pub async fn find_with_share(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        sqlx::query_as::<_, DashboardRow>(
            "SELECT d.id, d.name, d.user_id, d.private, du.permission AS share_permission \
             FROM dashboards d \
             LEFT JOIN dashboard_users du ON du.dashboard_id = d.id AND du.user_id = $2 \
             WHERE d.id = $1",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// List the dashboards `caller` may see, ordered by name.
    pub async fn list_visible(
        pool: &PgPool,
        caller: &Caller,
    ) -> Result<Vec<DashboardListRow>, sqlx::Error> {
        sqlx::query_as::<_, DashboardListRow>(
            "SELECT d.id, d.name, d.user_id, d.private, du.permission AS share_permission, \
                    u.alias AS owner_alias, u.name AS owner_name, u.surname AS owner_surname \
             FROM dashboards d \
             LEFT JOIN dashboard_users du ON du.dashboard_id = d.id AND du.user_id = $1 \
             LEFT JOIN users u ON u.id = d.user_id \
             WHERE $2 OR d.user_id = $1 OR NOT d.private OR du.permission IS NOT NULL \
             ORDER BY d.name ASC, d.id ASC",
        )
        .bind(caller.user_id)
        .bind(caller.user_type == UserType::SuperAdmin)
        .fetch_all(pool)
        .await
    }
}
