//! End-to-end access control tests over the full router.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{error_code, TestApp};
use credential_vault::domain::UserRole;

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = TestApp::new();
    let division = app.division("Finance", None).await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/divisions/{}/credentials", division.id),
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new();
    let alice = app.user("alice", UserRole::User).await;
    let token = app.token_issued_at(&alice, Utc::now() - Duration::minutes(61));

    let (status, body) = app.get("/api/me", &token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_token_still_valid_before_expiry() {
    let app = TestApp::new();
    let alice = app.user("alice", UserRole::User).await;
    let token = app.token_issued_at(&alice, Utc::now() - Duration::minutes(59));

    let (status, body) = app.get("/api/me", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/me", "not.a.jwt").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_register_with_elevated_role_forbidden() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({"username": "mallory", "password": "password123", "role": "admin"})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({"username": "carol", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
    assert_eq!(body["tokenType"], "Bearer");

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "carol", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap().to_string();
    let (status, body) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "carol");
}

// =============================================================================
// Division-scoped credentials
// =============================================================================

#[tokio::test]
async fn test_member_sees_only_held_divisions() {
    let app = TestApp::new();
    let d1 = app.division("Finance", None).await;
    let d2 = app.division("IT", None).await;
    let alice = app.user("alice", UserRole::User).await;
    let ops = app.user("ops", UserRole::User).await;
    app.grant(alice.id, &[d1.id]).await;
    app.grant(ops.id, &[d2.id]).await;
    let token = app.token(&alice);

    let (status, body) = app
        .post(
            &format!("/api/divisions/{}/credentials", d1.id),
            &token,
            json!({"name": "Payroll", "username": "pay", "password": "s3cret"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let payroll_id = body["credential"]["id"].clone();

    let (status, _) = app
        .post(
            &format!("/api/divisions/{}/credentials", d2.id),
            &app.token(&ops),
            json!({"name": "VPN", "username": "ops", "password": "tunnel"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .get(&format!("/api/divisions/{}/credentials", d1.id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], payroll_id);
    assert_eq!(listed[0]["divisionId"], json!(d1.id));

    let (status, _) = app
        .get(&format!("/api/divisions/{}/credentials", d2.id), &token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_credential_is_not_found_before_role_check() {
    let app = TestApp::new();
    let finance = app.division("Finance", None).await;
    let alice = app.user("alice", UserRole::User).await;
    app.grant(alice.id, &[finance.id]).await;
    let token = app.token(&alice);
    let uri = format!("/api/divisions/{}/credentials/{}", finance.id, Uuid::new_v4());

    let (status, body) = app.put(&uri, &token, json!({"password": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_division_is_not_found_before_forbidden() {
    let app = TestApp::new();
    let alice = app.user("alice", UserRole::User).await;
    let token = app.token(&alice);

    let (status, _) = app
        .get(&format!("/api/divisions/{}/credentials", Uuid::new_v4()), &token)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_credential_lifecycle_by_role() {
    let app = TestApp::new();
    let finance = app.division("Finance", None).await;
    let alice = app.user("alice", UserRole::User).await;
    let boss = app.user("boss", UserRole::Management).await;
    app.grant(alice.id, &[finance.id]).await;
    app.grant(boss.id, &[finance.id]).await;
    let alice_token = app.token(&alice);
    let boss_token = app.token(&boss);
    let base = format!("/api/divisions/{}/credentials", finance.id);

    // Any member may add
    let (status, body) = app
        .post(
            &base,
            &alice_token,
            json!({"name": "Payroll", "username": "pay", "password": "s3cret"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Credential added successfully");
    let id = body["credential"]["id"].as_str().unwrap().to_string();

    // Plain users may not update
    let (status, _) = app
        .put(&format!("{}/{}", base, id), &alice_token, json!({"password": "new"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Management may; only the given field changes
    let (status, body) = app
        .put(&format!("{}/{}", base, id), &boss_token, json!({"password": "rotated"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credential"]["password"], "rotated");
    assert_eq!(body["credential"]["name"], "Payroll");

    let (status, body) = app.get(&base, &alice_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["password"], "rotated");

    let (status, _) = app.delete(&format!("{}/{}", base, id), &alice_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&format!("{}/{}", base, id), &boss_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Credential deleted successfully");

    let (status, body) = app.get(&base, &alice_token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_credential_outside_division_not_found() {
    let app = TestApp::new();
    let finance = app.division("Finance", None).await;
    let it = app.division("IT", None).await;
    let boss = app.user("boss", UserRole::Management).await;
    app.grant(boss.id, &[finance.id, it.id]).await;
    let token = app.token(&boss);

    let (_, body) = app
        .post(
            &format!("/api/divisions/{}/credentials", it.id),
            &token,
            json!({"name": "VPN", "username": "ops", "password": "pw"}),
        )
        .await;
    let id = body["credential"]["id"].as_str().unwrap().to_string();

    // Addressed through the wrong division
    let (status, _) = app
        .delete(
            &format!("/api/divisions/{}/credentials/{}", finance.id, id),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_without_membership_is_forbidden() {
    let app = TestApp::new();
    let finance = app.division("Finance", None).await;
    let admin = app.user("root", UserRole::Admin).await;

    let (status, _) = app
        .get(
            &format!("/api/divisions/{}/credentials", finance.id),
            &app.token(&admin),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Admin-only operations
// =============================================================================

#[tokio::test]
async fn test_non_admin_cannot_change_roles() {
    let app = TestApp::new();
    let boss = app.user("boss", UserRole::Management).await;
    let alice = app.user("alice", UserRole::User).await;

    let (status, _) = app
        .put(
            &format!("/api/admin/change-role/{}", alice.id),
            &app.token(&boss),
            json!({"newRole": "admin"}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.reload(alice.id).await.role, UserRole::User);
}

#[tokio::test]
async fn test_non_admin_with_empty_role_is_forbidden() {
    let app = TestApp::new();
    let alice = app.user("alice", UserRole::User).await;

    let (status, _) = app
        .put(
            &format!("/api/admin/change-role/{}", alice.id),
            &app.token(&alice),
            json!({"newRole": ""}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_with_empty_role_gets_invalid_role() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    let alice = app.user("alice", UserRole::User).await;

    let (status, body) = app
        .put(
            &format!("/api/admin/change-role/{}", alice.id),
            &app.token(&admin),
            json!({"newRole": ""}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_ROLE");
}

#[tokio::test]
async fn test_admin_changes_role() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    let alice = app.user("alice", UserRole::User).await;
    let token = app.token(&admin);

    let (status, body) = app
        .put(
            &format!("/api/admin/change-role/{}", alice.id),
            &token,
            json!({"newRole": "management"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "management");

    let (status, body) = app
        .put(
            &format!("/api/admin/change-role/{}", alice.id),
            &token,
            json!({"newRole": "superuser"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_ROLE");
}

#[tokio::test]
async fn test_role_change_applies_to_existing_token() {
    let app = TestApp::new();
    let finance = app.division("Finance", None).await;
    let admin = app.user("root", UserRole::Admin).await;
    let alice = app.user("alice", UserRole::User).await;
    app.grant(alice.id, &[finance.id]).await;
    let alice_token = app.token(&alice);

    app.put(
        &format!("/api/admin/change-role/{}", alice.id),
        &app.token(&admin),
        json!({"newRole": "management"}),
    )
    .await;

    let (_, body) = app
        .post(
            &format!("/api/divisions/{}/credentials", finance.id),
            &alice_token,
            json!({"name": "CMS", "username": "ed", "password": "pw"}),
        )
        .await;
    let id = body["credential"]["id"].as_str().unwrap().to_string();

    // Same token, fresh role from the store
    let (status, _) = app
        .put(
            &format!("/api/divisions/{}/credentials/{}", finance.id, id),
            &alice_token,
            json!({"name": "CMS admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    let alice = app.user("alice", UserRole::User).await;

    let (status, _) = app.get("/api/users", &app.token(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/users", &app.token(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(body[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_org_structure_admin() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    let alice = app.user("alice", UserRole::User).await;
    let token = app.token(&admin);

    let (status, _) = app
        .post("/api/admin/ous", &app.token(&alice), json!({"name": "Newsroom"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, ou) = app
        .post("/api/admin/ous", &token, json!({"name": "Newsroom"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, division) = app
        .post(
            "/api/admin/divisions",
            &token,
            json!({"name": "Finance", "ouId": ou["id"]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(division["ou"]["name"], "Newsroom");

    let (status, _) = app
        .post("/api/admin/ous", &token, json!({"name": "Newsroom"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Everyone can read the structure
    let (status, body) = app.get("/api/ous", &app.token(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["divisions"][0]["name"], "Finance");

    let (status, moved) = app
        .put(
            &format!("/api/admin/divisions/{}/ou", division["id"].as_str().unwrap()),
            &token,
            json!({"ouId": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(moved["ou"].is_null());
}

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
