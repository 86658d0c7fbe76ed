//! Repository for the `widgets` and `widget_fields` tables.

use std::collections::HashMap;

use monitor_core::types::DbId;
use monitor_core::widget::{RawWidget, RawWidgetField};
use sqlx::PgPool;

use crate::models::widget::{WidgetFieldRow, WidgetRow};

/// Column list for `widgets` queries.
const WIDGET_COLUMNS: &str = "id, dashboard_id, type, name, x, y, width, height";

/// Column list for `widget_fields` queries.
const FIELD_COLUMNS: &str = "id, widget_id, type, name, value_int, value_str, \
    value_groupid, value_hostid, value_itemid, value_graphid, value_sysmapid";

/// Provides reads of dashboard widgets and their configuration fields.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Load a dashboard's widgets ordered by grid position (row, then column),
    /// each with its fields in storage order.
    pub async fn list_for_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Vec<RawWidget>, sqlx::Error> {
        let query = format!(
            "SELECT {WIDGET_COLUMNS} FROM widgets \
             WHERE dashboard_id = $1 \
             ORDER BY y ASC, x ASC, id ASC"
        );
        let widgets = sqlx::query_as::<_, WidgetRow>(&query)
            .bind(dashboard_id)
            .fetch_all(pool)
            .await?;

        if widgets.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = widgets.iter().map(|w| w.id).collect();
        let query = format!(
            "SELECT {FIELD_COLUMNS} FROM widget_fields \
             WHERE widget_id = ANY($1) \
             ORDER BY id ASC"
        );
        let field_rows = sqlx::query_as::<_, WidgetFieldRow>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut fields_by_widget: HashMap<DbId, Vec<RawWidgetField>> = HashMap::new();
        for row in field_rows {
            fields_by_widget
                .entry(row.widget_id)
                .or_default()
                .push(row.into());
        }

        Ok(widgets
            .into_iter()
            .map(|w| {
                let fields = fields_by_widget.remove(&w.id).unwrap_or_default();
                w.into_raw(fields)
            })
            .collect())
    }

    /// Id of the dashboard a widget belongs to, or `None` for an unknown widget.
    pub async fn find_dashboard_id(
        pool: &PgPool,
        widget_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT dashboard_id FROM widgets WHERE id = $1")
            .bind(widget_id)
            .fetch_optional(pool)
            .await
    }
}
