//! Account flows through the full router.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use vitrina_integration_tests::TestContext;

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "correct-horse",
        "password2": "correct-horse"
    })
}

#[tokio::test]
async fn test_register_login_profile_logout() {
    let ctx = TestContext::new().await;

    let registered = ctx
        .post_json("/accounts/register/", &registration("alice"))
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let body = registered.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");
    let token = body["token"].as_str().unwrap().to_owned();
    assert_eq!(token.len(), 40);

    // Login hands back the same live token
    let login = ctx
        .post_json(
            "/accounts/login/",
            &json!({"username": "alice", "password": "correct-horse"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.json()["token"], token.as_str());

    let profile = ctx
        .with_token(Method::GET, "/accounts/profile/", &token)
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.json()["user"]["email"], "alice@example.com");

    let logout = ctx
        .with_token(Method::POST, "/accounts/logout/", &token)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.json()["success"], true);

    // The revoked token no longer authenticates
    let after = ctx
        .with_token(Method::GET, "/accounts/profile/", &token)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.json()["success"], false);
}

#[tokio::test]
async fn test_register_rejects_duplicate_and_mismatch() {
    let ctx = TestContext::new().await;

    let first = ctx
        .post_json("/accounts/register/", &registration("bob"))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let duplicate = ctx
        .post_json("/accounts/register/", &registration("bob"))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    let body = duplicate.json();
    assert_eq!(body["success"], false);
    assert!(body["errors"]["username"].is_array());

    let mismatch = ctx
        .post_json(
            "/accounts/register/",
            &json!({
                "username": "carol",
                "email": "carol@example.com",
                "password": "correct-horse",
                "password2": "battery-staple"
            }),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);
    assert!(mismatch.json()["errors"]["password2"].is_array());

    assert_eq!(ctx.users.user_count(), 1);
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = TestContext::new().await;
    ctx.post_json("/accounts/register/", &registration("dave"))
        .await;

    let missing = ctx
        .post_json("/accounts/login/", &json!({"username": "dave"}))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json()["success"], false);

    let wrong = ctx
        .post_json(
            "/accounts/login/",
            &json!({"username": "dave", "password": "not-the-password"}),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .with_token(Method::GET, "/accounts/profile/", "not-a-real-token")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let anonymous = ctx.get("/accounts/profile/").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_username() {
    let ctx = TestContext::new().await;
    ctx.post_json("/accounts/register/", &registration("erin"))
        .await;

    let taken = ctx.get("/accounts/check-username/?username=erin").await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.json()["available"], false);

    let free = ctx.get("/accounts/check-username/?username=frank").await;
    assert_eq!(free.json()["available"], true);

    let empty = ctx.get("/accounts/check-username/?username=").await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_pages_render() {
    let ctx = TestContext::new().await;

    let login = ctx.get("/accounts/login-form/").await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("data-account-form=\"login\""));

    let register = ctx.get("/accounts/register-form/").await;
    assert_eq!(register.status, StatusCode::OK);
    assert!(register.body.contains("name=\"password2\""));
}
