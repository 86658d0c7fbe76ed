//! Database-backed tests for the dashboard page, list and refresh-rate routes.
//!
//! Each test gets a fresh database with the seeded super admin (id 1) and the
//! public "Global view" dashboard (id 1) with six widgets.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, put_json_auth, token_for, SEEDED_ADMIN_ID, SEEDED_DASHBOARD_ID};
use monitor_core::profile::{self, ProfileValue};
use monitor_core::roles::UserType;
use monitor_core::types::DbId;
use monitor_core::widget::RawWidgetField;
use monitor_db::repositories::ProfileRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, alias: &str, user_type: UserType) -> (DbId, String) {
    let id = sqlx::query_scalar::<_, DbId>(
        "INSERT INTO users (alias, name, surname, user_type) VALUES ($1, '', '', $2) RETURNING id",
    )
    .bind(alias)
    .bind(user_type.as_str())
    .fetch_one(pool)
    .await
    .expect("user creation should succeed");
    (id, token_for(id, user_type))
}

async fn create_dashboard(pool: &PgPool, name: &str, owner_id: DbId, private: bool) -> DbId {
    sqlx::query_scalar::<_, DbId>(
        "INSERT INTO dashboards (name, user_id, private) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(owner_id)
    .bind(private)
    .fetch_one(pool)
    .await
    .expect("dashboard creation should succeed")
}

/// Grant a share on a dashboard (2 = read, 3 = read-write).
async fn share_dashboard(pool: &PgPool, dashboard_id: DbId, user_id: DbId, permission: i16) {
    sqlx::query("INSERT INTO dashboard_users (dashboard_id, user_id, permission) VALUES ($1, $2, $3)")
        .bind(dashboard_id)
        .bind(user_id)
        .bind(permission)
        .execute(pool)
        .await
        .expect("share should succeed");
}

async fn create_widget(pool: &PgPool, dashboard_id: DbId, widget_type: &str, name: &str) -> DbId {
    sqlx::query_scalar::<_, DbId>(
        "INSERT INTO widgets (dashboard_id, type, name, x, y, width, height) \
         VALUES ($1, $2, $3, 0, 0, 4, 3) RETURNING id",
    )
    .bind(dashboard_id)
    .bind(widget_type)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("widget creation should succeed")
}

async fn add_field(pool: &PgPool, widget_id: DbId, field: &RawWidgetField) {
    sqlx::query(
        "INSERT INTO widget_fields (widget_id, type, name, value_int, value_str) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(widget_id)
    .bind(field.field_type)
    .bind(&field.name)
    .bind(field.value_int)
    .bind(&field.value_str)
    .execute(pool)
    .await
    .expect("field insert should succeed");
}

async fn view(pool: &PgPool, token: &str, query: &str) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/dashboard/view{query}"), token).await;
    let status = response.status();
    let json = if status == StatusCode::SEE_OTHER {
        serde_json::Value::Null
    } else {
        body_json(response).await
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Dashboard resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn first_visit_opens_default_dashboard(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "operator", UserType::User).await;

    let (status, json) = view(&pool, &token, "").await;

    assert_eq!(status, StatusCode::OK);
    let page = &json["data"];
    assert_eq!(page["title"], "Dashboard");
    assert_eq!(page["dashboard"]["dashboardid"], SEEDED_DASHBOARD_ID);
    assert_eq!(page["dashboard"]["name"], "Global view");
    assert_eq!(page["dashboard"]["editable"], false);
    assert_eq!(page["dashboard"]["owner"]["id"], SEEDED_ADMIN_ID);
    assert_eq!(page["dashboard"]["owner"]["name"], "Admin (Zabbix Administrator)");
    assert_eq!(page["grid_widgets"].as_object().unwrap().len(), 6);
    assert_eq!(page["fullscreen"], 0);

    let remembered = ProfileRepo::get_id(&pool, user_id, profile::DASHBOARD_ID, 0)
        .await
        .unwrap();
    assert_eq!(remembered, SEEDED_DASHBOARD_ID);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn widgets_are_normalized_in_grid_order(pool: PgPool) {
    let (_, token) = create_user(&pool, "operator", UserType::User).await;

    let (_, json) = view(&pool, &token, "?fullscreen=1").await;

    let widgets = json["data"]["grid_widgets"].as_object().unwrap();
    let ids: Vec<&String> = widgets.keys().collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);

    let problems = &widgets["1"];
    assert_eq!(problems["type"], "problems");
    assert_eq!(problems["pos"], serde_json::json!({ "row": 0, "col": 0, "height": 5, "width": 12 }));
    assert_eq!(problems["rf_rate"], 60);
    assert_eq!(problems["fields"], serde_json::json!({ "show_tags": "3" }));

    assert_eq!(widgets["4"]["rf_rate"], 900);
    assert_eq!(json["data"]["fullscreen"], 1);
    assert_eq!(json["data"]["dynamic"]["has_dynamic_widgets"], false);
    assert!(json["data"]["widget_defaults"]["navtree"].is_object());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn new_dashboard_is_blank_and_owned_by_caller(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "builder", UserType::User).await;

    let (status, json) = view(&pool, &token, "?new=1&dashboardid=1").await;

    assert_eq!(status, StatusCode::OK);
    let dashboard = &json["data"]["dashboard"];
    assert_eq!(dashboard["dashboardid"], 0);
    assert_eq!(dashboard["name"], "");
    assert_eq!(dashboard["editable"], true);
    assert_eq!(dashboard["owner"]["id"], user_id);
    assert_eq!(dashboard["owner"]["name"], "builder");
    assert_eq!(json["data"]["grid_widgets"], serde_json::json!({}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clone_copies_name_and_widgets(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "copier", UserType::User).await;

    let (status, json) = view(&pool, &token, "?source_dashboardid=1").await;

    assert_eq!(status, StatusCode::OK);
    let dashboard = &json["data"]["dashboard"];
    assert_eq!(dashboard["dashboardid"], 0);
    assert_eq!(dashboard["name"], "Global view");
    assert_eq!(dashboard["editable"], true);
    assert_eq!(dashboard["owner"]["id"], user_id);
    assert_eq!(json["data"]["grid_widgets"].as_object().unwrap().len(), 6);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clone_of_missing_source_redirects_to_list(pool: PgPool) {
    let (_, token) = create_user(&pool, "copier", UserType::User).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/dashboard/view?source_dashboardid=999", &token).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/api/v1/dashboards");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn explicit_missing_dashboard_is_denied(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "operator", UserType::User).await;
    ProfileRepo::update(&pool, user_id, profile::DASHBOARD_ID, 0, &ProfileValue::Id(1))
        .await
        .unwrap();

    let (status, json) = view(&pool, &token, "?dashboardid=999").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn nothing_selected_after_list_opened_redirects(pool: PgPool) {
    let (_, token) = create_user(&pool, "lister", UserType::User).await;

    let app = common::build_test_app(pool.clone());
    let list = get_auth(app, "/api/v1/dashboards", &token).await;
    assert_eq!(list.status(), StatusCode::OK);

    let (status, _) = view(&pool, &token, "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn remembered_dashboard_is_reopened(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "owner", UserType::User).await;
    let mine = create_dashboard(&pool, "Mine", user_id, true).await;

    let (status, _) = view(&pool, &token, &format!("?dashboardid={mine}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = view(&pool, &token, "").await;
    assert_eq!(json["data"]["dashboard"]["dashboardid"], mine);
    assert_eq!(json["data"]["dashboard"]["editable"], true);
}

// ---------------------------------------------------------------------------
// Visibility and sharing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn private_dashboard_follows_shares(pool: PgPool) {
    let (owner_id, _) = create_user(&pool, "owner", UserType::User).await;
    let (reader_id, reader_token) = create_user(&pool, "reader", UserType::User).await;
    let (writer_id, writer_token) = create_user(&pool, "writer", UserType::User).await;
    let (_, stranger_token) = create_user(&pool, "stranger", UserType::Admin).await;

    let private = create_dashboard(&pool, "Secret", owner_id, true).await;
    share_dashboard(&pool, private, reader_id, 2).await;
    share_dashboard(&pool, private, writer_id, 3).await;
    let query = format!("?dashboardid={private}");

    let (status, _) = view(&pool, &stranger_token, &query).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = view(&pool, &reader_token, &query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["dashboard"]["editable"], false);
    assert_eq!(json["data"]["dashboard"]["owner"]["name"], "owner");

    let (_, json) = view(&pool, &writer_token, &query).await;
    assert_eq!(json["data"]["dashboard"]["editable"], true);

    let super_admin = token_for(SEEDED_ADMIN_ID, UserType::SuperAdmin);
    let (status, json) = view(&pool, &super_admin, &query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["dashboard"]["editable"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_shows_visible_dashboards_by_name(pool: PgPool) {
    let (owner_id, _) = create_user(&pool, "owner", UserType::User).await;
    let (_, token) = create_user(&pool, "viewer", UserType::User).await;
    create_dashboard(&pool, "Hidden", owner_id, true).await;
    create_dashboard(&pool, "Alpha", owner_id, false).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/dashboards", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alpha", "Global view"]);
    assert_eq!(json["data"][0]["editable"], false);
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rate_override_is_applied(pool: PgPool) {
    let (_, token) = create_user(&pool, "tuner", UserType::User).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/dashboards/widgets/4/rf-rate",
        &token,
        serde_json::json!({ "rf_rate": 30 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!({ "widgetid": 4, "rf_rate": 30 }));

    let (_, json) = view(&pool, &token, "?dashboardid=1").await;
    assert_eq!(json["data"]["grid_widgets"]["4"]["rf_rate"], 30);
    assert_eq!(json["data"]["grid_widgets"]["5"]["rf_rate"], 900);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rate_on_hidden_widget_is_denied(pool: PgPool) {
    let (owner_id, _) = create_user(&pool, "owner", UserType::User).await;
    let (_, token) = create_user(&pool, "snoop", UserType::User).await;
    let private = create_dashboard(&pool, "Secret", owner_id, true).await;
    let widget = create_widget(&pool, private, "clock", "").await;

    for path in [
        format!("/api/v1/dashboards/widgets/{widget}/rf-rate"),
        "/api/v1/dashboards/widgets/9999/rf-rate".to_string(),
    ] {
        let app = common::build_test_app(pool.clone());
        let response =
            put_json_auth(app, &path, &token, serde_json::json!({ "rf_rate": 10 })).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dynamic_widget_and_repeated_fields(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "dyn", UserType::User).await;
    let dashboard = create_dashboard(&pool, "Dynamic", user_id, true).await;
    let widget = create_widget(&pool, dashboard, "graph", "CPU").await;

    let field = |name: &str, field_type: i16, value_int: i32, value_str: &str| RawWidgetField {
        name: name.into(),
        field_type,
        value_int,
        value_str: value_str.into(),
        ..Default::default()
    };
    for f in [
        field("dynamic", 0, 1, ""),
        field("columns", 1, 0, "3"),
        field("columns", 1, 0, "5"),
    ] {
        add_field(&pool, widget, &f).await;
    }

    let (_, json) = view(&pool, &token, &format!("?dashboardid={dashboard}")).await;

    let page = &json["data"];
    assert_eq!(page["dynamic"]["has_dynamic_widgets"], true);
    let fields = &page["grid_widgets"][widget.to_string()]["fields"];
    assert_eq!(fields["dynamic"], "1");
    assert_eq!(fields["columns"], serde_json::json!(["3", "5"]));
    assert_eq!(page["grid_widgets"][widget.to_string()]["header"], "CPU");
}

// ---------------------------------------------------------------------------
// Page filter
// ---------------------------------------------------------------------------

async fn seed_host(pool: &PgPool, group: &str, host: &str, with_item: bool) -> (DbId, DbId) {
    let group_id: DbId = sqlx::query_scalar(
        "INSERT INTO host_groups (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
    )
    .bind(group)
    .fetch_one(pool)
    .await
    .unwrap();
    let host_id: DbId =
        sqlx::query_scalar("INSERT INTO hosts (host, name) VALUES ($1, $1) RETURNING id")
            .bind(host)
            .fetch_one(pool)
            .await
            .unwrap();
    sqlx::query("INSERT INTO hosts_groups (host_id, group_id) VALUES ($1, $2)")
        .bind(host_id)
        .bind(group_id)
        .execute(pool)
        .await
        .unwrap();
    if with_item {
        sqlx::query("INSERT INTO items (host_id, name) VALUES ($1, 'cpu')")
            .bind(host_id)
            .execute(pool)
            .await
            .unwrap();
    }
    (group_id, host_id)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn page_filter_selection_is_remembered(pool: PgPool) {
    let (_, token) = create_user(&pool, "filterer", UserType::User).await;
    let (linux, web01) = seed_host(&pool, "Linux servers", "web01", true).await;
    let (empty, _) = seed_host(&pool, "Idle", "idle01", false).await;

    let (_, json) = view(&pool, &token, &format!("?groupid={linux}&hostid={web01}")).await;
    let filter = &json["data"]["page_filter"];
    assert_eq!(filter["groupid"], linux);
    assert_eq!(filter["hostid"], web01);
    assert_eq!(filter["groups"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["dynamic"]["hostid"], web01);

    let (_, json) = view(&pool, &token, "").await;
    assert_eq!(json["data"]["page_filter"]["groupid"], linux);
    assert_eq!(json["data"]["page_filter"]["hostid"], web01);

    let (_, json) = view(&pool, &token, &format!("?groupid={empty}")).await;
    assert_eq!(json["data"]["page_filter"]["groupid"], 0);
}
