mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use deadline_entity::notification::NotificationKind;
use helpers::{TestApp, token_for};

#[tokio::test]
async fn test_health_without_database() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "not_configured");
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = TestApp::new();
    let user = app.user("alice");

    let (status, body) = app.send(Method::GET, "/api/deadlines", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let forged = token_for(user.id, "not-the-server-secret");
    let (status, _) = app
        .send(Method::GET, "/api/deadlines", Some(&forged), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deadline_crud_flow() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let id = app.create_deadline(&owner, "Thesis").await;

    let (status, body) = app.get(&format!("/api/deadlines/{id}"), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Thesis");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["access"]["level"], "owner");

    let (status, body) = app
        .put(
            &format!("/api/deadlines/{id}"),
            &owner,
            Some(json!({ "title": "Thesis draft", "priority": "high", "description": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Thesis draft");
    assert_eq!(body["data"]["priority"], "high");
    assert!(body["data"]["description"].is_null());

    let (status, body) = app
        .post(&format!("/api/deadlines/{id}/complete"), &owner, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["completed_at"].is_string());

    let (status, body) = app.get("/api/deadlines", &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/api/deadlines/{id}"), &owner).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/deadlines/{id}"), &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = TestApp::new();
    let owner = app.user("owner");

    let (status, body) = app
        .post(
            "/api/deadlines",
            &owner,
            json!({ "title": "", "due_at": "2030-01-01T00:00:00Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let (status, body) = app
        .post("/api/deadlines", &owner, json!({ "title": "No due date" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_overdue_status_is_rejected() {
    let app = TestApp::new();
    let owner = app.user("owner");

    let (status, body) = app
        .post(
            "/api/deadlines",
            &owner,
            json!({ "title": "Essay", "due_at": "2099-01-01T00:00:00Z", "status": "overdue" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let id = app.create_deadline(&owner, "Essay").await;
    let (status, _) = app
        .put(
            &format!("/api/deadlines/{id}"),
            &owner,
            Some(json!({ "status": "overdue" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = app.get(&format!("/api/deadlines/{id}"), &owner).await;
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn test_strangers_cannot_see_or_edit() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let stranger = app.user("stranger");
    let id = app.create_deadline(&owner, "Private").await;

    let (status, _) = app.get(&format!("/api/deadlines/{id}"), &stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .put(
            &format!("/api/deadlines/{id}"),
            &stranger,
            Some(json!({ "title": "Mine now" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_add_collaborators_reports_each_candidate() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let friend = app.user("friend");
    let stranger = app.user("stranger");
    app.befriend(&owner, &friend);
    let id = app.create_deadline(&owner, "Launch").await;

    let (status, body) = app
        .post(
            &format!("/api/deadlines/{id}/collaborators"),
            &owner,
            json!({ "collaborators": [friend.id, stranger.id, owner.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let added = body["data"]["added"].as_array().unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0]["user_id"], friend.id.to_string());

    let skipped = body["data"]["skipped"].as_array().unwrap();
    let codes: Vec<&str> = skipped.iter().map(|s| s["code"].as_str().unwrap()).collect();
    assert!(codes.contains(&"not_friends"));
    assert!(codes.contains(&"self_add"));

    let (status, body) = app.get(&format!("/api/deadlines/{id}"), &friend).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["access"]["level"], "collaborator");

    let (status, body) = app
        .get(&format!("/api/deadlines/{id}/collaborators"), &friend)
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert!(
        entries
            .iter()
            .any(|e| e["user_id"] == friend.id.to_string() && e["kind"] == "collaborator")
    );

    let inbox = app.store.notifications_for(friend.id);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::CollaboratorAdded);
}

#[tokio::test]
async fn test_add_collaborators_with_copies() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let friend = app.user("friend");
    app.befriend(&owner, &friend);
    let id = app.create_deadline(&owner, "Budget").await;

    let (status, body) = app
        .post(
            &format!("/api/deadlines/{id}/collaborators"),
            &owner,
            json!({
                "collaborators": [friend.id],
                "create_copies": true,
                "copy_options": { "include_description": false }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let copy_id = body["data"]["added"][0]["copy_id"].as_str().unwrap().to_string();

    let (status, _) = app.get(&format!("/api/deadlines/{id}"), &friend).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get(&format!("/api/deadlines/{copy_id}"), &friend).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Budget (My Copy)");
    assert_eq!(body["data"]["origin_deadline_id"], id.to_string());
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["access"]["level"], "owner");
}

#[tokio::test]
async fn test_add_collaborators_requires_candidates() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let id = app.create_deadline(&owner, "Empty").await;

    let (status, body) = app
        .post(
            &format!("/api/deadlines/{id}/collaborators"),
            &owner,
            json!({ "collaborators": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_collaborator_can_leave_but_not_delete() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let friend = app.user("friend");
    app.befriend(&owner, &friend);
    let id = app.create_deadline(&owner, "Trip").await;
    app.post(
        &format!("/api/deadlines/{id}/collaborators"),
        &owner,
        json!({ "collaborators": [friend.id] }),
    )
    .await;

    let (status, _) = app.delete(&format!("/api/deadlines/{id}"), &friend).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/deadlines/{id}/collaborators/{}", owner.id), &friend)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .delete(&format!("/api/deadlines/{id}/collaborators/{}", friend.id), &friend)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/deadlines/{id}"), &friend).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_inbox_endpoints() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let friend = app.user("friend");
    app.befriend(&owner, &friend);
    for title in ["One", "Two"] {
        let id = app.create_deadline(&owner, title).await;
        app.post(
            &format!("/api/deadlines/{id}/collaborators"),
            &owner,
            json!({ "collaborators": [friend.id] }),
        )
        .await;
    }

    let (status, body) = app.get("/api/notifications/unread-count", &friend).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (status, body) = app
        .get("/api/notifications?page=1&per_page=1", &friend)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["total_items"], 2);
    let first = body["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/notifications/{first}/read"), &friend, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/notifications/unread-count", &friend).await;
    assert_eq!(body["data"]["count"], 1);

    let (status, _) = app
        .put(&format!("/api/notifications/{first}/read"), &owner, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.put("/api/notifications/read-all", &friend, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["marked"], 1);

    let (status, _) = app
        .delete(&format!("/api/notifications/{first}"), &friend)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/notifications", &friend).await;
    assert_eq!(body["data"]["total_items"], 1);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let app = TestApp::new();
    let user = app.user("prefs");

    let (status, body) = app.get("/api/notifications/preferences", &user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"]["daily_summary"], false);
    assert_eq!(body["data"]["in_app"]["reminders"]["1_hour"], true);

    let mut preferences = body["data"].clone();
    preferences["email"]["daily_summary"] = json!(true);
    preferences["in_app"]["reminders"]["48_hours"] = json!(false);
    let (status, body) = app
        .put(
            "/api/notifications/preferences",
            &user,
            Some(json!({ "preferences": preferences })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"]["daily_summary"], true);

    let (_, body) = app.get("/api/notifications/preferences", &user).await;
    assert_eq!(body["data"]["email"]["daily_summary"], true);
    assert_eq!(body["data"]["in_app"]["reminders"]["48_hours"], false);
}
