//! Per-user preference ("profile") keys and value types.
//!
//! Profiles are scoped to the authenticated user. A key may carry a
//! secondary index (`idx2`), e.g. the widget id for refresh-rate overrides.

/// Last dashboard the user viewed.
pub const DASHBOARD_ID: &str = "web.dashbrd.dashboardid";

/// Set to `1` once the user has opened the dashboard list.
pub const LIST_WAS_OPENED: &str = "web.dashbrd.list_was_opened";

/// Per-widget refresh-rate override in seconds; `idx2` is the widget id.
pub const WIDGET_RF_RATE: &str = "web.dashbrd.widget.rf_rate";

/// Whether the dashboard filter is enabled.
pub const FILTER_ENABLED: &str = "web.dashconf.filter.enable";

/// Remembered page-filter host group.
pub const FILTER_GROUP_ID: &str = "web.dashbrd.groupid";

/// Remembered page-filter host.
pub const FILTER_HOST_ID: &str = "web.dashbrd.hostid";

/// Storage slot a profile value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ProfileType {
    Id = 1,
    Int = 2,
    Str = 3,
}

impl ProfileType {
    pub fn id(self) -> i16 {
        self as i16
    }
}

/// A typed value to write into the profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValue {
    Id(crate::types::DbId),
    Int(i32),
    Str(String),
}

impl ProfileValue {
    pub fn profile_type(&self) -> ProfileType {
        match self {
            ProfileValue::Id(_) => ProfileType::Id,
            ProfileValue::Int(_) => ProfileType::Int,
            ProfileValue::Str(_) => ProfileType::Str,
        }
    }
}
