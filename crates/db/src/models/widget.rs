//! Widget and widget field row models.

use monitor_core::types::DbId;
use monitor_core::widget::{RawWidget, RawWidgetField};
use sqlx::FromRow;

/// A row from the `widgets` table.
#[derive(Debug, Clone, FromRow)]
pub struct WidgetRow {
    pub id: DbId,
    pub dashboard_id: DbId,
    #[sqlx(rename = "type")]
    pub widget_type: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A row from the `widget_fields` table.
#[derive(Debug, Clone, FromRow)]
pub struct WidgetFieldRow {
    pub id: DbId,
    pub widget_id: DbId,
    #[sqlx(rename = "type")]
    pub field_type: i16,
    pub name: String,
    pub value_int: i32,
    pub value_str: String,
    pub value_groupid: Option<DbId>,
    pub value_hostid: Option<DbId>,
    pub value_itemid: Option<DbId>,
    pub value_graphid: Option<DbId>,
    pub value_sysmapid: Option<DbId>,
}

impl From<WidgetFieldRow> for RawWidgetField {
    fn from(row: WidgetFieldRow) -> Self {
        RawWidgetField {
            name: row.name,
            field_type: row.field_type,
            value_int: row.value_int,
            value_str: row.value_str,
            value_groupid: row.value_groupid,
            value_hostid: row.value_hostid,
            value_itemid: row.value_itemid,
            value_graphid: row.value_graphid,
            value_sysmapid: row.value_sysmapid,
        }
    }
}

impl WidgetRow {
    /// Attach the widget's fields (already in storage order).
    pub fn into_raw(self, fields: Vec<RawWidgetField>) -> RawWidget {
        RawWidget {
            widgetid: self.id,
            widget_type: self.widget_type,
            name: self.name,
            row: self.y,
            col: self.x,
            height: self.height,
            width: self.width,
            fields,
        }
    }
}
