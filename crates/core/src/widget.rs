//! Widget catalog and normalization of stored widgets into view models.
//!
//! Stored widgets carry their configuration as a flat list of typed field
//! rows. The dashboard page wants a name -> value map instead, where a name
//! that repeats (multi-select fields such as host groups) collapses into a
//! list that keeps every occurrence in order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Refresh rate used for type tags the catalog does not know.
pub const DEFAULT_RF_RATE: u32 = 60;

/// Refresh rates (seconds) a user may pick for a widget. `0` disables refresh.
pub const RF_RATE_CHOICES: &[u32] = &[0, 10, 30, 60, 120, 600, 900];

/// Field name that marks a widget as following the page host selection.
pub const DYNAMIC_FIELD: &str = "dynamic";

const SEC_PER_MIN: u32 = 60;

// ---------------------------------------------------------------------------
// Widget types
// ---------------------------------------------------------------------------

/// The fixed set of widget kinds a dashboard can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    ActionLog,
    Clock,
    DataOverview,
    Discovery,
    FavGraphs,
    FavMaps,
    FavScreens,
    Graph,
    NavTree,
    PlainText,
    ProblemHosts,
    Problems,
    ProblemsBySeverity,
    Map,
    SystemInfo,
    TriggerOverview,
    Url,
    Web,
}

impl WidgetType {
    pub const ALL: [WidgetType; 18] = [
        WidgetType::ActionLog,
        WidgetType::Clock,
        WidgetType::DataOverview,
        WidgetType::Discovery,
        WidgetType::FavGraphs,
        WidgetType::FavMaps,
        WidgetType::FavScreens,
        WidgetType::Graph,
        WidgetType::NavTree,
        WidgetType::PlainText,
        WidgetType::ProblemHosts,
        WidgetType::Problems,
        WidgetType::ProblemsBySeverity,
        WidgetType::Map,
        WidgetType::SystemInfo,
        WidgetType::TriggerOverview,
        WidgetType::Url,
        WidgetType::Web,
    ];

    /// Wire name as stored in `widgets.type`.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::ActionLog => "actionlog",
            WidgetType::Clock => "clock",
            WidgetType::DataOverview => "dataover",
            WidgetType::Discovery => "discovery",
            WidgetType::FavGraphs => "favgraphs",
            WidgetType::FavMaps => "favmaps",
            WidgetType::FavScreens => "favscreens",
            WidgetType::Graph => "graph",
            WidgetType::NavTree => "navtree",
            WidgetType::PlainText => "plaintext",
            WidgetType::ProblemHosts => "problemhosts",
            WidgetType::Problems => "problems",
            WidgetType::ProblemsBySeverity => "problemsbysv",
            WidgetType::Map => "sysmap",
            WidgetType::SystemInfo => "systeminfo",
            WidgetType::TriggerOverview => "trigover",
            WidgetType::Url => "url",
            WidgetType::Web => "web",
        }
    }

    /// Refresh rate in seconds when the user has not overridden it.
    pub fn default_rf_rate(self) -> u32 {
        match self {
            WidgetType::NavTree | WidgetType::Url => 0,
            WidgetType::Clock
            | WidgetType::FavGraphs
            | WidgetType::FavMaps
            | WidgetType::FavScreens
            | WidgetType::Map => 15 * SEC_PER_MIN,
            _ => SEC_PER_MIN,
        }
    }

    /// Header shown for a freshly added widget.
    pub fn default_header(self) -> &'static str {
        match self {
            WidgetType::ActionLog => "Action log",
            WidgetType::Clock => "Clock",
            WidgetType::DataOverview => "Data overview",
            WidgetType::Discovery => "Discovery status",
            WidgetType::FavGraphs => "Favourite graphs",
            WidgetType::FavMaps => "Favourite maps",
            WidgetType::FavScreens => "Favourite screens",
            WidgetType::Graph => "Graph",
            WidgetType::NavTree => "Map navigation tree",
            WidgetType::PlainText => "Plain text",
            WidgetType::ProblemHosts => "Problem hosts",
            WidgetType::Problems => "Problems",
            WidgetType::ProblemsBySeverity => "Problems by severity",
            WidgetType::Map => "Map",
            WidgetType::SystemInfo => "System information",
            WidgetType::TriggerOverview => "Trigger overview",
            WidgetType::Url => "URL",
            WidgetType::Web => "Web monitoring",
        }
    }

    /// Grid size (width, height) of a freshly added widget on the 12-column grid.
    pub fn default_size(self) -> WidgetSize {
        let (width, height) = match self {
            WidgetType::Clock
            | WidgetType::FavGraphs
            | WidgetType::FavMaps
            | WidgetType::FavScreens => (4, 3),
            WidgetType::Discovery | WidgetType::PlainText | WidgetType::Web => (6, 3),
            WidgetType::NavTree => (4, 5),
            WidgetType::Map => (9, 5),
            _ => (12, 5),
        };
        WidgetSize { width, height }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown widget type '{s}'")))
    }
}

/// Default refresh rate for a stored type tag, tolerating tags the catalog
/// does not know.
pub fn default_rf_rate_for(type_name: &str) -> u32 {
    type_name
        .parse::<WidgetType>()
        .map(WidgetType::default_rf_rate)
        .unwrap_or(DEFAULT_RF_RATE)
}

/// Whether `rf_rate` is one of the selectable refresh rates.
pub fn is_valid_rf_rate(rf_rate: u32) -> bool {
    RF_RATE_CHOICES.contains(&rf_rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

/// Per-type defaults handed to the client for the "add widget" dialog.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetDefaults {
    pub header: &'static str,
    pub size: WidgetSize,
    pub rf_rate: u32,
}

/// Defaults for every widget type, keyed by wire name in catalog order.
pub fn widget_defaults() -> IndexMap<&'static str, WidgetDefaults> {
    WidgetType::ALL
        .into_iter()
        .map(|t| {
            (
                t.as_str(),
                WidgetDefaults {
                    header: t.default_header(),
                    size: t.default_size(),
                    rf_rate: t.default_rf_rate(),
                },
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// Column of a `widget_fields` row that holds the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSlot {
    Int,
    Str,
    GroupId,
    HostId,
    ItemId,
    GraphId,
    SysmapId,
}

/// Type tag of a stored widget field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum WidgetFieldType {
    Int32 = 0,
    Str = 1,
    Group = 2,
    Host = 3,
    Item = 4,
    ItemPrototype = 5,
    Graph = 6,
    GraphPrototype = 7,
    Map = 8,
}

impl WidgetFieldType {
    pub fn from_id(id: i16) -> Option<Self> {
        Some(match id {
            0 => WidgetFieldType::Int32,
            1 => WidgetFieldType::Str,
            2 => WidgetFieldType::Group,
            3 => WidgetFieldType::Host,
            4 => WidgetFieldType::Item,
            5 => WidgetFieldType::ItemPrototype,
            6 => WidgetFieldType::Graph,
            7 => WidgetFieldType::GraphPrototype,
            8 => WidgetFieldType::Map,
            _ => return None,
        })
    }

    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn value_slot(self) -> ValueSlot {
        match self {
            WidgetFieldType::Int32 => ValueSlot::Int,
            WidgetFieldType::Str => ValueSlot::Str,
            WidgetFieldType::Group => ValueSlot::GroupId,
            WidgetFieldType::Host => ValueSlot::HostId,
            WidgetFieldType::Item | WidgetFieldType::ItemPrototype => ValueSlot::ItemId,
            WidgetFieldType::Graph | WidgetFieldType::GraphPrototype => ValueSlot::GraphId,
            WidgetFieldType::Map => ValueSlot::SysmapId,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw (stored) widgets
// ---------------------------------------------------------------------------

/// A widget field as stored: a name, a type tag and one populated value slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawWidgetField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: i16,
    pub value_int: i32,
    pub value_str: String,
    pub value_groupid: Option<DbId>,
    pub value_hostid: Option<DbId>,
    pub value_itemid: Option<DbId>,
    pub value_graphid: Option<DbId>,
    pub value_sysmapid: Option<DbId>,
}

impl RawWidgetField {
    /// Read the value held in `slot` as its string form. Unset id slots read as `"0"`.
    pub fn value(&self, slot: ValueSlot) -> String {
        let id = match slot {
            ValueSlot::Int => return self.value_int.to_string(),
            ValueSlot::Str => return self.value_str.clone(),
            ValueSlot::GroupId => self.value_groupid,
            ValueSlot::HostId => self.value_hostid,
            ValueSlot::ItemId => self.value_itemid,
            ValueSlot::GraphId => self.value_graphid,
            ValueSlot::SysmapId => self.value_sysmapid,
        };
        id.unwrap_or(0).to_string()
    }
}

/// A widget as loaded from storage, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawWidget {
    pub widgetid: DbId,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub name: String,
    pub row: i32,
    pub col: i32,
    pub height: i32,
    pub width: i32,
    pub fields: Vec<RawWidgetField>,
}

// ---------------------------------------------------------------------------
// Normalized widgets
// ---------------------------------------------------------------------------

/// Value of a normalized widget field.
///
/// A field name seen once stays a scalar; a repeated name becomes a list of
/// every occurrence in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Add another occurrence of the same field name.
    pub fn push(&mut self, value: String) {
        match self {
            FieldValue::Scalar(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::List(vec![first, value]);
            }
            FieldValue::List(values) => values.push(value),
        }
    }
}

/// Field name -> value, in first-seen order.
pub type FieldMap = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetPosition {
    pub row: u32,
    pub col: u32,
    pub height: u32,
    pub width: u32,
}

/// A widget shaped for the dashboard grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub widgetid: DbId,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub header: String,
    pub pos: WidgetPosition,
    pub rf_rate: u32,
    pub fields: FieldMap,
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Collapse stored field rows into a name -> value map.
///
/// Rows with a type tag outside the catalog are skipped.
pub fn normalize_fields(fields: &[RawWidgetField]) -> FieldMap {
    let mut map = FieldMap::new();

    for field in fields {
        let Some(field_type) = WidgetFieldType::from_id(field.field_type) else {
            tracing::warn!(
                field = %field.name,
                field_type = field.field_type,
                "Skipping widget field with unknown type",
            );
            continue;
        };

        let value = field.value(field_type.value_slot());
        match map.get_mut(&field.name) {
            Some(existing) => existing.push(value),
            None => {
                map.insert(field.name.clone(), FieldValue::Scalar(value));
            }
        }
    }

    map
}

/// Shape stored widgets for the grid, keyed by widget id in input order.
///
/// `rf_rate_overrides` holds the user's stored refresh rates by widget id;
/// widgets without one get their type's default.
pub fn normalize_widgets(
    widgets: &[RawWidget],
    rf_rate_overrides: &HashMap<DbId, u32>,
) -> IndexMap<DbId, WidgetView> {
    widgets
        .iter()
        .map(|w| {
            let rf_rate = rf_rate_overrides
                .get(&w.widgetid)
                .copied()
                .unwrap_or_else(|| default_rf_rate_for(&w.widget_type));

            let view = WidgetView {
                widgetid: w.widgetid,
                widget_type: w.widget_type.clone(),
                header: w.name.clone(),
                pos: WidgetPosition {
                    row: non_negative(w.row),
                    col: non_negative(w.col),
                    height: non_negative(w.height),
                    width: non_negative(w.width),
                },
                rf_rate,
                fields: normalize_fields(&w.fields),
            };
            (w.widgetid, view)
        })
        .collect()
}

/// True if any widget has its `dynamic` field switched on.
pub fn has_dynamic_widgets(widgets: &[RawWidget]) -> bool {
    widgets.iter().any(|w| {
        w.fields
            .iter()
            .any(|f| f.name == DYNAMIC_FIELD && f.value_int == 1)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn str_field(name: &str, value: &str) -> RawWidgetField {
        RawWidgetField {
            name: name.to_string(),
            field_type: WidgetFieldType::Str.id(),
            value_str: value.to_string(),
            ..Default::default()
        }
    }

    fn int_field(name: &str, value: i32) -> RawWidgetField {
        RawWidgetField {
            name: name.to_string(),
            field_type: WidgetFieldType::Int32.id(),
            value_int: value,
            ..Default::default()
        }
    }

    fn widget(id: DbId, widget_type: &str, fields: Vec<RawWidgetField>) -> RawWidget {
        RawWidget {
            widgetid: id,
            widget_type: widget_type.to_string(),
            name: format!("Widget {id}"),
            row: 0,
            col: 0,
            height: 5,
            width: 12,
            fields,
        }
    }

    // -- Field normalization --

    #[test]
    fn single_field_stays_scalar() {
        let map = normalize_fields(&[str_field("url", "http://example.com")]);
        assert_eq!(
            map.get("url"),
            Some(&FieldValue::Scalar("http://example.com".into()))
        );
    }

    #[test]
    fn repeated_field_collapses_to_list() {
        let map = normalize_fields(&[str_field("columns", "3"), str_field("columns", "5")]);
        assert_eq!(
            map.get("columns"),
            Some(&FieldValue::List(vec!["3".into(), "5".into()]))
        );
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({ "columns": ["3", "5"] })
        );
    }

    #[test]
    fn list_keeps_every_occurrence_in_order() {
        let fields: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|v| str_field("tags", v))
            .collect();
        let map = normalize_fields(&fields);
        assert_matches!(map.get("tags"), Some(FieldValue::List(v)) if v == &["a", "b", "c", "d"]);
    }

    #[test]
    fn keys_keep_first_seen_order() {
        let map = normalize_fields(&[
            str_field("b", "1"),
            str_field("a", "2"),
            str_field("b", "3"),
            str_field("c", "4"),
        ]);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn value_is_read_from_the_type_slot() {
        let host = RawWidgetField {
            name: "hostids".into(),
            field_type: WidgetFieldType::Host.id(),
            value_str: "ignored".into(),
            value_hostid: Some(10084),
            ..Default::default()
        };
        let graph = RawWidgetField {
            name: "graphid".into(),
            field_type: WidgetFieldType::GraphPrototype.id(),
            value_graphid: Some(42),
            ..Default::default()
        };
        let map = normalize_fields(&[host, graph, int_field("show_lines", 25)]);
        assert_eq!(map["hostids"], FieldValue::Scalar("10084".into()));
        assert_eq!(map["graphid"], FieldValue::Scalar("42".into()));
        assert_eq!(map["show_lines"], FieldValue::Scalar("25".into()));
    }

    #[test]
    fn unset_id_slot_reads_as_zero() {
        let field = RawWidgetField {
            name: "groupids".into(),
            field_type: WidgetFieldType::Group.id(),
            ..Default::default()
        };
        assert_eq!(field.value(ValueSlot::GroupId), "0");
    }

    #[test]
    fn unknown_field_type_is_skipped() {
        let mut odd = str_field("mystery", "x");
        odd.field_type = 99;
        let map = normalize_fields(&[odd, str_field("name", "ok")]);
        assert!(!map.contains_key("mystery"));
        assert_eq!(map.len(), 1);
    }

    // -- Widget normalization --

    #[test]
    fn widgets_keep_input_order() {
        let widgets = vec![
            widget(30, "clock", vec![]),
            widget(10, "graph", vec![]),
            widget(20, "url", vec![]),
        ];
        let views = normalize_widgets(&widgets, &HashMap::new());
        let ids: Vec<_> = views.keys().copied().collect();
        assert_eq!(ids, [30, 10, 20]);
    }

    #[test]
    fn rf_rate_prefers_stored_override() {
        let widgets = vec![widget(1, "clock", vec![]), widget(2, "clock", vec![])];
        let overrides = HashMap::from([(2, 30)]);
        let views = normalize_widgets(&widgets, &overrides);
        assert_eq!(views[&1].rf_rate, 900);
        assert_eq!(views[&2].rf_rate, 30);
    }

    #[test]
    fn unknown_widget_type_gets_generic_rf_rate() {
        let views = normalize_widgets(&[widget(1, "custom", vec![])], &HashMap::new());
        assert_eq!(views[&1].rf_rate, DEFAULT_RF_RATE);
        assert_eq!(views[&1].widget_type, "custom");
    }

    #[test]
    fn negative_positions_clamp_to_zero() {
        let mut w = widget(1, "graph", vec![]);
        w.row = -2;
        w.col = 3;
        w.height = -1;
        let views = normalize_widgets(&[w], &HashMap::new());
        assert_eq!(
            views[&1].pos,
            WidgetPosition { row: 0, col: 3, height: 0, width: 12 }
        );
    }

    #[test]
    fn header_comes_from_widget_name() {
        let views = normalize_widgets(&[widget(7, "problems", vec![])], &HashMap::new());
        assert_eq!(views[&7].header, "Widget 7");
    }

    // -- Dynamic detection --

    #[test]
    fn no_widgets_means_not_dynamic() {
        assert!(!has_dynamic_widgets(&[]));
    }

    #[test]
    fn dynamic_field_set_to_one_is_detected() {
        let widgets = vec![
            widget(1, "graph", vec![int_field("dynamic", 0)]),
            widget(2, "graph", vec![str_field("name", "x"), int_field("dynamic", 1)]),
        ];
        assert!(has_dynamic_widgets(&widgets));
    }

    #[test]
    fn dynamic_field_with_other_values_is_ignored() {
        let widgets = vec![
            widget(1, "graph", vec![int_field("dynamic", 0)]),
            widget(2, "graph", vec![int_field("dynamic", 2)]),
            widget(3, "graph", vec![int_field("not_dynamic", 1)]),
        ];
        assert!(!has_dynamic_widgets(&widgets));
    }

    // -- Catalog --

    #[test]
    fn default_rf_rates_follow_type() {
        assert_eq!(WidgetType::NavTree.default_rf_rate(), 0);
        assert_eq!(WidgetType::Url.default_rf_rate(), 0);
        assert_eq!(WidgetType::Map.default_rf_rate(), 900);
        assert_eq!(WidgetType::Problems.default_rf_rate(), 60);
    }

    #[test]
    fn wire_names_parse_back() {
        for t in WidgetType::ALL {
            assert_eq!(t.as_str().parse::<WidgetType>().unwrap(), t);
        }
        assert!("carousel".parse::<WidgetType>().is_err());
    }

    #[test]
    fn defaults_cover_every_type() {
        let defaults = widget_defaults();
        assert_eq!(defaults.len(), WidgetType::ALL.len());
        assert_eq!(defaults["sysmap"].size, WidgetSize { width: 9, height: 5 });
        assert_eq!(defaults["clock"].rf_rate, 900);
    }

    #[test]
    fn rf_rate_choices() {
        assert!(is_valid_rf_rate(0));
        assert!(is_valid_rf_rate(600));
        assert!(!is_valid_rf_rate(5));
    }
}
