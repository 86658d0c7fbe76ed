//! Repository for hosts and host groups, as seen by the page filter.
//!
//! Only monitored hosts with at least one enabled item count; groups are
//! listed only when they contain such a host.

use monitor_core::page_filter::FilterOption;
use monitor_core::types::DbId;
use sqlx::PgPool;

/// `hosts.status` value for a monitored host.
const HOST_STATUS_MONITORED: i16 = 0;

/// `items.status` value for an enabled item.
const ITEM_STATUS_ACTIVE: i16 = 0;

/// Provides the selectable groups and hosts for dashboard filters.
pub struct HostRepo;

impl HostRepo {
    /// Host groups containing at least one monitored host with items.
    pub async fn monitored_groups(pool: &PgPool) -> Result<Vec<FilterOption>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, String)>(
            "SELECT g.id, g.name FROM host_groups g \
             WHERE EXISTS ( \
                 SELECT 1 FROM hosts_groups hg \
                 JOIN hosts h ON h.id = hg.host_id \
                 WHERE hg.group_id = g.id AND h.status = $1 \
                   AND EXISTS (SELECT 1 FROM items i WHERE i.host_id = h.id AND i.status = $2) \
             ) \
             ORDER BY g.name ASC",
        )
        .bind(HOST_STATUS_MONITORED)
        .bind(ITEM_STATUS_ACTIVE)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(to_option).collect())
    }

    /// Monitored hosts with items, limited to `group_id` unless it is unset (`0`).
    pub async fn monitored_hosts(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<FilterOption>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, String)>(
            "SELECT h.id, h.name FROM hosts h \
             WHERE h.status = $1 \
               AND EXISTS (SELECT 1 FROM items i WHERE i.host_id = h.id AND i.status = $2) \
               AND ($3::BIGINT = 0 OR EXISTS ( \
                   SELECT 1 FROM hosts_groups hg WHERE hg.host_id = h.id AND hg.group_id = $3)) \
             ORDER BY h.name ASC",
        )
        .bind(HOST_STATUS_MONITORED)
        .bind(ITEM_STATUS_ACTIVE)
        .bind(group_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(to_option).collect())
    }
}

fn to_option((id, name): (DbId, String)) -> FilterOption {
    FilterOption { id, name }
}
