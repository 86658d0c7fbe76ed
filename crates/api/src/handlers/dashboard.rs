//! Handlers for the dashboard page, the dashboard list and per-widget
//! refresh-rate overrides.
//!
//! The page handler runs as a pipeline: the query is validated by its
//! extractor, [`check_permissions`] resolves the dashboard, and
//! [`build_page`] either assembles the page or redirects to the list.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use indexmap::IndexMap;
use monitor_core::dashboard::{
    select_dashboard, DashboardRequest, DashboardSelector, DashboardView, Owner,
};
use monitor_core::error::CoreError;
use monitor_core::page_filter::{resolve_selection, PageFilter};
use monitor_core::profile::{self, ProfileValue};
use monitor_core::roles::{Caller, UserType};
use monitor_core::types::{DbId, UNSET_ID};
use monitor_core::widget::{
    has_dynamic_widgets, is_valid_rf_rate, normalize_widgets, widget_defaults, WidgetDefaults,
    WidgetView,
};
use monitor_db::models::dashboard::DashboardListItem;
use monitor_db::repositories::{DashboardRepo, HostRepo, ProfileRepo, UserRepo, WidgetRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::{Validate, ValidationError};

use crate::controller::Flow;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireUser;
use crate::proceed;
use crate::response::DataResponse;
use crate::state::AppState;

/// Where the page sends callers when no dashboard resolves.
pub const DASHBOARD_LIST_PATH: &str = "/api/v1/dashboards";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query params for `GET /dashboard/view`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DashboardViewQuery {
    #[validate(range(max = 1, message = "must be 0 or 1"))]
    pub fullscreen: Option<u8>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub dashboardid: Option<DbId>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub source_dashboardid: Option<DbId>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub groupid: Option<DbId>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub hostid: Option<DbId>,
    #[validate(range(min = 1, max = 1, message = "must be 1"))]
    pub new: Option<u8>,
}

impl DashboardViewQuery {
    fn dashboard_request(&self) -> DashboardRequest {
        DashboardRequest {
            new: self.new.is_some(),
            source_dashboardid: self.source_dashboardid,
            dashboardid: self.dashboardid,
        }
    }
}

/// Values the client needs to refresh widgets that follow the page filter.
#[derive(Debug, Serialize)]
pub struct DynamicContext {
    pub has_dynamic_widgets: bool,
    pub hostid: DbId,
    pub groupid: DbId,
}

/// Everything the dashboard page renders from.
#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub dashboard: DashboardView,
    pub fullscreen: u8,
    pub filter_enabled: bool,
    pub grid_widgets: IndexMap<DbId, WidgetView>,
    pub widget_defaults: IndexMap<&'static str, WidgetDefaults>,
    pub page_filter: PageFilter,
    pub dynamic: DynamicContext,
}

/// Body for `PUT /dashboards/widgets/{id}/rf-rate`.
#[derive(Debug, Deserialize, Validate)]
pub struct RfRateInput {
    #[validate(custom(function = "validate_rf_rate"))]
    pub rf_rate: u32,
}

fn validate_rf_rate(rf_rate: u32) -> Result<(), ValidationError> {
    if is_valid_rf_rate(rf_rate) {
        Ok(())
    } else {
        Err(ValidationError::new("rf_rate")
            .with_message("must be one of 0, 10, 30, 60, 120, 600, 900".into()))
    }
}

#[derive(Debug, Serialize)]
pub struct RfRateUpdated {
    pub widgetid: DbId,
    pub rf_rate: u32,
}

// ---------------------------------------------------------------------------
// Dashboard page
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/view
pub async fn view_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DashboardViewQuery>,
) -> AppResult<Response> {
    let caller = user.caller();

    let dashboard = check_permissions(&state, &caller, &query).await?;
    let page = proceed!(build_page(&state.pool, &caller, &query, dashboard).await?);

    Ok(Json(DataResponse { data: page }).into_response())
}

/// Permission stage: the caller must be at least a `user`, and a dashboard
/// asked for by id must resolve.
///
/// Returns the resolved dashboard, which may be `None` when the request
/// named no dashboard and nothing was remembered.
pub async fn check_permissions(
    state: &AppState,
    caller: &Caller,
    query: &DashboardViewQuery,
) -> AppResult<Option<DashboardView>> {
    if caller.user_type < UserType::User {
        tracing::debug!(user_id = caller.user_id, "Guest session denied dashboard");
        return Err(CoreError::no_permissions().into());
    }

    let dashboard = resolve_dashboard(
        &state.pool,
        caller,
        &query.dashboard_request(),
        state.config.default_dashboard_id,
    )
    .await?;

    if let (Some(dashboard_id), None) = (query.dashboardid, &dashboard) {
        tracing::info!(
            user_id = caller.user_id,
            dashboard_id,
            "Requested dashboard missing or not visible",
        );
        return Err(CoreError::no_permissions().into());
    }

    Ok(dashboard)
}

/// Action stage: redirect to the list when nothing resolved, otherwise
/// assemble the page.
pub async fn build_page(
    pool: &PgPool,
    caller: &Caller,
    query: &DashboardViewQuery,
    dashboard: Option<DashboardView>,
) -> AppResult<Flow<DashboardPage>> {
    let Some(dashboard) = dashboard else {
        tracing::debug!(user_id = caller.user_id, "No dashboard selected, redirecting to list");
        return Ok(Flow::terminal(Redirect::to(DASHBOARD_LIST_PATH)));
    };

    let page_filter = load_page_filter(pool, caller.user_id, query).await?;
    let filter_enabled =
        ProfileRepo::get_int(pool, caller.user_id, profile::FILTER_ENABLED, 0).await? == 1;

    let rf_rates = if dashboard.widgets.is_empty() {
        HashMap::new()
    } else {
        load_rf_rate_overrides(pool, caller.user_id).await?
    };

    let grid_widgets = normalize_widgets(&dashboard.widgets, &rf_rates);
    let dynamic = DynamicContext {
        has_dynamic_widgets: has_dynamic_widgets(&dashboard.widgets),
        hostid: page_filter.hostid,
        groupid: page_filter.groupid,
    };

    tracing::debug!(
        user_id = caller.user_id,
        dashboard_id = dashboard.dashboardid,
        widgets = grid_widgets.len(),
        "Dashboard page built",
    );

    Ok(Flow::Continue(DashboardPage {
        title: "Dashboard",
        dashboard,
        fullscreen: query.fullscreen.unwrap_or(0),
        filter_enabled,
        grid_widgets,
        widget_defaults: widget_defaults(),
        page_filter,
        dynamic,
    }))
}

/// Resolve which dashboard the page shows. See [`select_dashboard`] for the
/// precedence rules. A stored dashboard that is opened is remembered as the
/// user's last dashboard.
pub async fn resolve_dashboard(
    pool: &PgPool,
    caller: &Caller,
    request: &DashboardRequest,
    default_id: DbId,
) -> AppResult<Option<DashboardView>> {
    let remembered_id =
        ProfileRepo::get_id(pool, caller.user_id, profile::DASHBOARD_ID, UNSET_ID).await?;
    let list_was_opened =
        ProfileRepo::get_int(pool, caller.user_id, profile::LIST_WAS_OPENED, 0).await? == 1;

    match select_dashboard(request, remembered_id, list_was_opened, default_id) {
        DashboardSelector::New => {
            let owner = resolve_owner(pool, caller.user_id).await?;
            Ok(Some(DashboardView::new_for(owner)))
        }
        DashboardSelector::Clone(source_id) => {
            let Some(source) = DashboardRepo::find_with_share(pool, source_id, caller.user_id)
                .await?
                .filter(|row| row.access().is_visible_to(caller))
            else {
                return Ok(None);
            };
            let widgets = WidgetRepo::list_for_dashboard(pool, source.id).await?;
            let owner = resolve_owner(pool, caller.user_id).await?;
            Ok(Some(DashboardView::cloned_from(source.name, widgets, owner)))
        }
        DashboardSelector::Existing(dashboard_id) => {
            let Some(row) = DashboardRepo::find_with_share(pool, dashboard_id, caller.user_id)
                .await?
                .filter(|row| row.access().is_visible_to(caller))
            else {
                return Ok(None);
            };
            let widgets = WidgetRepo::list_for_dashboard(pool, row.id).await?;
            let owner = resolve_owner(pool, row.user_id).await?;

            ProfileRepo::update(
                pool,
                caller.user_id,
                profile::DASHBOARD_ID,
                0,
                &ProfileValue::Id(row.id),
            )
            .await?;

            Ok(Some(DashboardView {
                dashboardid: row.id,
                editable: row.access().is_editable_by(caller),
                name: row.name,
                owner,
                widgets,
            }))
        }
        DashboardSelector::Nothing => Ok(None),
    }
}

/// Owner id and display name; an unknown user resolves to a placeholder.
pub async fn resolve_owner(pool: &PgPool, user_id: DbId) -> AppResult<Owner> {
    match UserRepo::find_by_id(pool, user_id).await? {
        Some(user) => Ok(user.to_owner()),
        None => {
            tracing::warn!(user_id, "Dashboard owner not found");
            Ok(Owner::inaccessible(user_id))
        }
    }
}

async fn load_page_filter(
    pool: &PgPool,
    user_id: DbId,
    query: &DashboardViewQuery,
) -> AppResult<PageFilter> {
    let groups = HostRepo::monitored_groups(pool).await?;
    let remembered_group =
        ProfileRepo::get_id(pool, user_id, profile::FILTER_GROUP_ID, UNSET_ID).await?;
    let groupid = resolve_selection(query.groupid, remembered_group, &groups);

    let hosts = HostRepo::monitored_hosts(pool, groupid).await?;
    let remembered_host =
        ProfileRepo::get_id(pool, user_id, profile::FILTER_HOST_ID, UNSET_ID).await?;
    let hostid = resolve_selection(query.hostid, remembered_host, &hosts);

    if query.groupid.is_some() {
        ProfileRepo::update(pool, user_id, profile::FILTER_GROUP_ID, 0, &ProfileValue::Id(groupid))
            .await?;
    }
    if query.hostid.is_some() {
        ProfileRepo::update(pool, user_id, profile::FILTER_HOST_ID, 0, &ProfileValue::Id(hostid))
            .await?;
    }

    Ok(PageFilter {
        groupid,
        hostid,
        groups,
        hosts,
    })
}

/// Stored refresh rates by widget id. Negative stored values are ignored.
async fn load_rf_rate_overrides(pool: &PgPool, user_id: DbId) -> AppResult<HashMap<DbId, u32>> {
    let stored = ProfileRepo::list_int_by_idx2(pool, user_id, profile::WIDGET_RF_RATE).await?;
    Ok(stored
        .into_iter()
        .filter_map(|(widget_id, rate)| u32::try_from(rate).ok().map(|rate| (widget_id, rate)))
        .collect())
}

// ---------------------------------------------------------------------------
// Dashboard list
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboards
///
/// Opening the list is remembered: from then on, a visit to the dashboard
/// page with nothing selected lands here instead of on the default dashboard.
pub async fn list_dashboards(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> AppResult<Json<DataResponse<Vec<DashboardListItem>>>> {
    let caller = user.caller();

    ProfileRepo::update(
        &state.pool,
        caller.user_id,
        profile::LIST_WAS_OPENED,
        0,
        &ProfileValue::Int(1),
    )
    .await?;

    let items = DashboardRepo::list_visible(&state.pool, &caller)
        .await?
        .into_iter()
        .map(|row| row.into_item(&caller))
        .collect();

    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// Widget refresh rate
// ---------------------------------------------------------------------------

/// PUT /api/v1/dashboards/widgets/{id}/rf-rate
pub async fn update_widget_rf_rate(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(widget_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<RfRateInput>,
) -> AppResult<Json<DataResponse<RfRateUpdated>>> {
    let caller = user.caller();

    let dashboard_id = WidgetRepo::find_dashboard_id(&state.pool, widget_id)
        .await?
        .ok_or_else(CoreError::no_permissions)?;

    let visible = DashboardRepo::find_with_share(&state.pool, dashboard_id, caller.user_id)
        .await?
        .is_some_and(|row| row.access().is_visible_to(&caller));
    if !visible {
        return Err(AppError::Core(CoreError::no_permissions()));
    }

    let rate = i32::try_from(input.rf_rate)
        .map_err(|_| AppError::BadRequest(format!("rf_rate {} out of range", input.rf_rate)))?;
    ProfileRepo::update(
        &state.pool,
        caller.user_id,
        profile::WIDGET_RF_RATE,
        widget_id,
        &ProfileValue::Int(rate),
    )
    .await?;

    tracing::info!(
        user_id = caller.user_id,
        widget_id,
        rf_rate = input.rf_rate,
        "Widget refresh rate updated",
    );

    Ok(Json(DataResponse {
        data: RfRateUpdated {
            widgetid: widget_id,
            rf_rate: input.rf_rate,
        },
    }))
}
