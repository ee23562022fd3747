mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{connect_child, delete, get, post, put, register_parent, test_app};

#[tokio::test]
async fn connect_copies_family_code_and_starts_active() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();

    let child = connect_child(&app, code, "Tom", "device-1").await;
    assert_eq!(child["parentId"], parent["id"]);
    assert_eq!(child["familyCode"], code);
    assert_eq!(child["status"], "active");
    assert_eq!(child["deviceInfo"], "Pixel 7");
    assert_eq!(child["age"], 10);
    assert!(child["lastSeen"].is_string());
}

#[tokio::test]
async fn connect_with_unknown_family_code_is_not_found() {
    let (app, _) = test_app().await;
    register_parent(&app, "Jane", "jane@x.com").await;

    let (status, body) = post(
        &app,
        "/api/children/connect",
        json!({ "familyCode": "SAFE-ZZZZZZZZ", "childName": "Tom", "deviceId": "device-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid family code");
}

#[tokio::test]
async fn connect_requires_fields() {
    let (app, _) = test_app().await;

    let (status, body) = post(
        &app,
        "/api/children/connect",
        json!({ "familyCode": "SAFE-ZZZZZZZZ", "childName": "Tom" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Family code, child name, and device ID are required");
}

#[tokio::test]
async fn device_can_only_belong_to_one_child() {
    let (app, _) = test_app().await;
    let jane = register_parent(&app, "Jane", "jane@x.com").await;
    let john = register_parent(&app, "John", "john@x.com").await;

    connect_child(&app, jane["familyCode"].as_str().unwrap(), "Tom", "shared-device").await;

    let (status, body) = post(
        &app,
        "/api/children/connect",
        json!({
            "familyCode": john["familyCode"],
            "childName": "Ann",
            "deviceId": "shared-device",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Device already connected");

    let (status, body) = post(
        &app,
        "/api/children/add",
        json!({ "parentId": john["id"], "childName": "Ann", "deviceId": "shared-device" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Device ID already in use");
}

#[tokio::test]
async fn non_numeric_child_id_is_not_found() {
    let (app, _) = test_app().await;

    let (status, body) = get(&app, "/api/children/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource not found");

    let (status, _) = delete(&app, "/api/children/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_can_add_child_manually() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;

    let (status, body) = post(
        &app,
        "/api/children/add",
        json!({ "parentId": parent["id"], "childName": "Lea", "deviceId": "device-9" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["familyCode"], parent["familyCode"]);
    assert_eq!(body["data"]["deviceInfo"], "");
    assert_eq!(body["data"]["age"], serde_json::Value::Null);

    let (status, body) = post(
        &app,
        "/api/children/add",
        json!({ "parentId": 9999, "childName": "Lea", "deviceId": "device-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Parent not found");

    let (status, _) = post(
        &app,
        "/api/children/add",
        json!({ "childName": "Lea", "deviceId": "device-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn child_login_matches_name_case_insensitively() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();
    let child = connect_child(&app, code, "Tom", "device-1").await;

    put(
        &app,
        &format!("/api/children/{}/status", child["id"]),
        json!({ "status": "inactive" }),
    )
    .await;

    let (status, body) = post(
        &app,
        "/api/children/login",
        json!({ "familyCode": code, "childName": "tOM" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], child["id"]);
    assert_eq!(body["data"]["status"], "active");

    let (status, _) = post(
        &app,
        "/api/children/login",
        json!({ "familyCode": code, "childName": "Nobody" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/children/login", json!({ "familyCode": code })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn child_login_picks_earliest_namesake() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();
    let first = connect_child(&app, code, "Sam", "device-1").await;
    connect_child(&app, code, "sam", "device-2").await;

    let (status, body) = post(
        &app,
        "/api/children/login",
        json!({ "familyCode": code, "childName": "SAM" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], first["id"]);
}

#[tokio::test]
async fn status_update_validates_and_finds_child() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let child = connect_child(&app, parent["familyCode"].as_str().unwrap(), "Tom", "d1").await;
    let uri = format!("/api/children/{}/status", child["id"]);

    let (status, body) = put(&app, &uri, json!({ "status": "inactive" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "inactive");

    let (status, _) = put(&app, &uri, json!({ "status": "sleeping" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put(&app, "/api/children/9999/status", json!({ "status": "active" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_children_are_listed_newest_first() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();
    connect_child(&app, code, "Tom", "d1").await;
    connect_child(&app, code, "Ann", "d2").await;

    let (status, body) = get(&app, &format!("/api/parents/{}/children", parent["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "Ann");
    assert_eq!(body["data"][1]["name"], "Tom");

    let (_, body) = get(&app, &format!("/api/parents/{}", parent["id"])).await;
    assert_eq!(body["data"]["childrenCount"], 2);

    let (status, _) = get(&app, "/api/parents/9999/children").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_deletes_exactly_one_child() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();
    let tom = connect_child(&app, code, "Tom", "d1").await;
    let ann = connect_child(&app, code, "Ann", "d2").await;

    let (status, body) = delete(&app, &format!("/api/children/{}", tom["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = delete(&app, &format!("/api/children/{}", tom["id"])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/api/children/{}", ann["id"])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn removed_device_can_be_connected_again() {
    let (app, _) = test_app().await;
    let parent = register_parent(&app, "Jane", "jane@x.com").await;
    let code = parent["familyCode"].as_str().unwrap();
    let tom = connect_child(&app, code, "Tom", "d1").await;

    delete(&app, &format!("/api/children/{}", tom["id"])).await;
    connect_child(&app, code, "Tom", "d1").await;
}
