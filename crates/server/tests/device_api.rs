mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{json_request, login, provision_and_login, provision_body, seed_learner, send, spawn_app};

fn facility_id(provisioned: &serde_json::Value) -> Uuid {
    provisioned["facility"]["id"].as_str().and_then(|s| s.parse().ok()).unwrap()
}

#[tokio::test]
async fn provisioning_happens_once() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, _) = provision_and_login(&t.app).await?;
    assert_eq!(provisioned["facility"]["name"], "Riverside School");
    assert_eq!(provisioned["preset"], "formal");
    assert_eq!(provisioned["superuser"]["username"], "admin");
    assert_eq!(provisioned["device_name"], "classroom-box");
    // formal facilities default to no guest access
    assert_eq!(provisioned["allow_guest_access"], false);
    assert!(provisioned["superuser"].get("password").is_none());

    let (status, _) =
        send(&t.app, json_request("POST", "/api/device/deviceprovision", None, Some(provision_body()))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn provisioning_rejects_bad_input() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let mut body = provision_body();
    body["preset"] = json!("chaotic");
    let (status, err) = send(&t.app, json_request("POST", "/api/device/deviceprovision", None, Some(body))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["detail"].as_str().unwrap_or_default().contains("preset"));

    let (status, _) = send(
        &t.app,
        json_request("POST", "/api/device/deviceprovision", None, Some(json!({"preset": "formal"}))),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // nothing was written, so a valid attempt still succeeds
    let (status, _) =
        send(&t.app, json_request("POST", "/api/device/deviceprovision", None, Some(provision_body()))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn free_space_for_home_and_content() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, token) = provision_and_login(&t.app).await?;

    let (status, body) = send(&t.app, json_request("GET", "/api/device/freespace", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["freespace"].as_u64().is_some());

    let (status, body) =
        send(&t.app, json_request("GET", "/api/device/freespace?path=Content", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["freespace"].as_u64().is_some());

    let missing = t.home.path().join("does-not-exist");
    let uri = format!("/api/device/freespace?path={}", missing.display());
    let (status, _) = send(&t.app, json_request("GET", &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    seed_learner(&t.db, facility_id(&provisioned), "learner", "pw-learner").await?;
    let learner = login(&t.app, "learner", "pw-learner").await?;
    let (status, _) = send(&t.app, json_request("GET", "/api/device/freespace", Some(&learner), None)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn device_info_depends_on_superuser() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, token) = provision_and_login(&t.app).await?;

    let (status, info) = send(&t.app, json_request("GET", "/api/device/deviceinfo", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(info["version"].is_string());
    assert!(info["content_storage_free_space"].as_u64().is_some());
    assert_eq!(info["device_id"].as_str().map(str::len), Some(32));
    assert_eq!(info["server_timezone"], "UTC");
    assert!(info["urls"].is_array());

    // stable across calls
    let (_, again) = send(&t.app, json_request("GET", "/api/device/deviceinfo", Some(&token), None)).await?;
    assert_eq!(info["device_id"], again["device_id"]);

    // content managers see the reduced view
    let fid = facility_id(&provisioned);
    let manager = seed_learner(&t.db, fid, "curator", "pw-curator").await?;
    models::device_permissions::create(&t.db, manager, false, true).await?;
    let curator = login(&t.app, "curator", "pw-curator").await?;
    let (status, reduced) = send(&t.app, json_request("GET", "/api/device/deviceinfo", Some(&curator), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(reduced.get("device_id").is_none());
    assert!(reduced.get("urls").is_none());
    assert!(reduced["content_storage_free_space"].as_u64().is_some());

    seed_learner(&t.db, fid, "learner", "pw-learner").await?;
    let learner = login(&t.app, "learner", "pw-learner").await?;
    let (status, _) = send(&t.app, json_request("GET", "/api/device/deviceinfo", Some(&learner), None)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn settings_read_and_partial_update() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, token) = provision_and_login(&t.app).await?;

    let (status, settings) =
        send(&t.app, json_request("GET", "/api/device/devicesettings", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["language_id"], "en");
    assert_eq!(settings["landing_page"], "homepage");

    let (status, updated) = send(
        &t.app,
        json_request(
            "PATCH",
            "/api/device/devicesettings",
            Some(&token),
            Some(json!({"landing_page": "learn", "allow_peer_unlisted_channel_import": true})),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["landing_page"], "learn");
    assert_eq!(updated["allow_peer_unlisted_channel_import"], true);
    // untouched fields keep their values
    assert_eq!(updated["language_id"], "en");

    let (status, _) = send(
        &t.app,
        json_request("PATCH", "/api/device/devicesettings", Some(&token), Some(json!({"landing_page": "nowhere"}))),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn device_name_round_trip() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, token) = provision_and_login(&t.app).await?;

    let (status, body) = send(&t.app, json_request("GET", "/api/device/devicename", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "classroom-box");

    let (status, body) = send(
        &t.app,
        json_request("PATCH", "/api/device/devicename", Some(&token), Some(json!({"name": "library"}))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "library");

    let too_long = "x".repeat(51);
    let (status, _) = send(
        &t.app,
        json_request("PATCH", "/api/device/devicename", Some(&token), Some(json!({"name": too_long}))),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&t.app, json_request("PATCH", "/api/device/devicename", Some(&token), Some(json!({})))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn device_permissions_crud() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, token) = provision_and_login(&t.app).await?;
    let fid = facility_id(&provisioned);
    let learner_id = seed_learner(&t.db, fid, "learner", "pw-learner").await?;

    let (status, list) = send(&t.app, json_request("GET", "/api/device/devicepermissions", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, created) = send(
        &t.app,
        json_request(
            "POST",
            "/api/device/devicepermissions",
            Some(&token),
            Some(json!({"user": learner_id, "is_superuser": false, "can_manage_content": true})),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["can_manage_content"], true);

    // one row per user
    let (status, _) = send(
        &t.app,
        json_request(
            "POST",
            "/api/device/devicepermissions",
            Some(&token),
            Some(json!({"user": learner_id, "is_superuser": false, "can_manage_content": false})),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/device/devicepermissions/{learner_id}");
    let (status, patched) =
        send(&t.app, json_request("PATCH", &uri, Some(&token), Some(json!({"is_superuser": true})))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["is_superuser"], true);
    assert_eq!(patched["can_manage_content"], true);

    let (status, replaced) = send(
        &t.app,
        json_request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"user": learner_id, "is_superuser": false, "can_manage_content": false})),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["is_superuser"], false);

    let (status, fetched) = send(&t.app, json_request("GET", &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["user"], learner_id.to_string());

    let (status, _) = send(&t.app, json_request("DELETE", &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&t.app, json_request("GET", &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &t.app,
        json_request("GET", &format!("/api/device/devicepermissions/{}", Uuid::new_v4()), Some(&token), None),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_superusers_cannot_grant_permissions() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, _) = provision_and_login(&t.app).await?;
    let fid = facility_id(&provisioned);
    let learner_id = seed_learner(&t.db, fid, "learner", "pw-learner").await?;
    let learner = login(&t.app, "learner", "pw-learner").await?;

    let (status, _) = send(
        &t.app,
        json_request(
            "POST",
            "/api/device/devicepermissions",
            Some(&learner),
            Some(json!({"user": learner_id, "is_superuser": true, "can_manage_content": true})),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn user_sync_status_listing() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (provisioned, token) = provision_and_login(&t.app).await?;
    let fid = facility_id(&provisioned);
    let queued_id = seed_learner(&t.db, fid, "queued", "pw-queued").await?;
    let idle_id = seed_learner(&t.db, fid, "idle", "pw-idle").await?;
    let queued = models::user_sync_status::create(&t.db, queued_id, None, true).await?;
    models::user_sync_status::create(&t.db, idle_id, None, false).await?;

    let (status, list) = send(&t.app, json_request("GET", "/api/device/usersyncstatus", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let uri = format!("/api/device/usersyncstatus?user={queued_id}");
    let (status, list) = send(&t.app, json_request("GET", &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["status"], "QUEUED");
    assert_eq!(list[0]["queued"], true);

    let uri = format!("/api/device/usersyncstatus?member_of={fid}");
    let (_, list) = send(&t.app, json_request("GET", &uri, Some(&token), None)).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let (status, _) =
        send(&t.app, json_request("GET", "/api/device/usersyncstatus?member_of=nope", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, one) = send(
        &t.app,
        json_request("GET", &format!("/api/device/usersyncstatus/{}", queued.id), Some(&token), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["user"], queued_id.to_string());

    // a learner only sees their own row
    let learner = login(&t.app, "idle", "pw-idle").await?;
    let (_, list) = send(&t.app, json_request("GET", "/api/device/usersyncstatus", Some(&learner), None)).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["user"], idle_id.to_string());
    assert!(list[0]["status"].is_null());
    Ok(())
}

#[tokio::test]
async fn malformed_ids_in_paths_get_json_errors() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, token) = provision_and_login(&t.app).await?;
    for uri in ["/api/device/devicepermissions/not-a-uuid", "/api/device/usersyncstatus/42"] {
        let (status, body) = send(&t.app, json_request("GET", uri, Some(&token), None)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "Validation Error");
        assert!(body["detail"].is_string());
    }
    Ok(())
}
