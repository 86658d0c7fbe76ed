//! HTTP tests for the message-template editor. The editor stores nothing,
//! so every request here runs without a database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_offline_app, post_json, post_json_auth, token_for};
use monitor_core::roles::UserType;
use serde_json::json;

const PATH: &str = "/api/v1/media-types/message-template";

async fn edit(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let token = token_for(3, UserType::Admin);
    let response = post_json_auth(build_offline_app(), PATH, &token, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn new_template_gets_first_free_type_and_canned_text() {
    let (status, json) = edit(json!({
        "type": 0,
        "content_type": 0,
        "message_types": [0],
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Message template");

    let params = &json["data"]["params"];
    assert_eq!(params["type"], 0);
    assert_eq!(params["message_type"], 1);
    assert_eq!(params["subject"], "Resolved in {EVENT.DURATION}: {EVENT.NAME}");
    assert_eq!(params["eventsource"], 0);
    assert_eq!(params["recovery"], 1);
    assert_eq!(params["message_types"], json!([0]));
    assert_eq!(params["types_exhausted"], false);
    assert!(params.get("old_message_type").is_none());
}

#[tokio::test]
async fn empty_in_use_set_picks_problem() {
    let (_, json) = edit(json!({ "type": 0, "content_type": 1 })).await;

    let params = &json["data"]["params"];
    assert_eq!(params["message_type"], 0);
    assert!(params["message"].as_str().unwrap().contains("<br>"));
}

#[tokio::test]
async fn exhausted_types_fall_back_to_problem() {
    let (status, json) = edit(json!({
        "type": 4,
        "content_type": 0,
        "message_types": [0, 1, 2, 3, 4, 5],
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let params = &json["data"]["params"];
    assert_eq!(params["message_type"], 0);
    assert_eq!(params["types_exhausted"], true);
}

#[tokio::test]
async fn editing_frees_the_old_type() {
    let (status, json) = edit(json!({
        "type": 2,
        "content_type": 0,
        "message_types": [0, 3],
        "message_type": 3,
        "old_message_type": 3,
        "subject": "",
        "message": "Found {DISCOVERY.DEVICE.IPADDRESS}",
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let params = &json["data"]["params"];
    assert_eq!(params["message_types"], json!([0]));
    assert_eq!(params["old_message_type"], 3);
    assert_eq!(params["message"], "Found {DISCOVERY.DEVICE.IPADDRESS}");
    assert_eq!(params["eventsource"], 1);
}

#[tokio::test]
async fn supplied_event_class_is_echoed() {
    let (_, json) = edit(json!({
        "type": 0,
        "content_type": 0,
        "message_type": 0,
        "eventsource": 3,
        "recovery": 0,
    }))
    .await;

    assert_eq!(json["data"]["params"]["eventsource"], 3);
}

#[tokio::test]
async fn guests_may_use_the_editor() {
    let token = token_for(2, UserType::Guest);
    let response = post_json_auth(
        build_offline_app(),
        PATH,
        &token,
        json!({ "type": 1, "content_type": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_request_returns_401() {
    let response = post_json(build_offline_app(), PATH, json!({ "type": 0, "content_type": 0 })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_bad_field_is_reported() {
    let (status, json) = edit(json!({
        "type": 7,
        "content_type": 2,
        "message_types": [0, 8],
        "subject": "x".repeat(256),
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_PARAMS");
    assert_eq!(json["details"].as_array().unwrap().len(), 4, "got {}", json["details"]);
}

#[tokio::test]
async fn wrongly_typed_body_is_rejected() {
    let (status, json) = edit(json!({ "type": "email", "content_type": 0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_PARAMS");
}
