//! Integration tests for the login service operations.

use greeter_client::models::Registration;
use greeter_client::{AuthStatus, Error, SessionSlot, TokenEncoding};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{ACCESS_TOKEN, BEARER_BASE64, TestHarness, logged_in};

// ----------------------------------------------------------------------------
// Registration
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_register_posts_credentials() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/users"))
        .and(body_json(json!({"user_name": "tobo", "user_password": "obot"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": 3, "user_name": "tobo"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let reg = Registration::new("tobo", "obot", "obot").unwrap();
    let info = h.client.register(&reg).await.unwrap();

    assert_eq!(info.user_id, 3);
    assert_eq!(info.user_name, "tobo");
}

#[tokio::test]
async fn test_register_tolerates_empty_body() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/users"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&h.server)
        .await;

    let reg = Registration::new("tobo", "obot", "obot").unwrap();
    let info = h.client.register(&reg).await.unwrap();

    assert_eq!(info.user_id, 0);
    assert_eq!(info.user_name, "tobo");
}

#[tokio::test]
async fn test_register_failure_reports_status() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("User tobo already exists"))
        .mount(&h.server)
        .await;

    let reg = Registration::new("tobo", "obot", "obot").unwrap();
    let err = h.client.register(&reg).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    match err {
        Error::Status { body, .. } => assert!(body.contains("already exists")),
        other => panic!("expected status error, got {other:?}"),
    }
}

// ----------------------------------------------------------------------------
// Login
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_login_begins_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .and(body_json(json!({"user_name": "tobo", "user_password": "obot"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 7,
            "login_id": "login-7",
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut slot = SessionSlot::empty();
    let session = h.client.login(&mut slot, "tobo", "obot").await.unwrap();

    assert_eq!(session.user_id, 7);
    assert_eq!(session.login_id, "login-7");
    assert_eq!(session.user_name, "tobo");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(slot.status(), AuthStatus::LoggedIn);
}

#[tokio::test]
async fn test_login_accepts_legacy_token_answer() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt"})))
        .mount(&h.server)
        .await;

    let mut slot = SessionSlot::empty();
    h.client.login(&mut slot, "tobo", "obot").await.unwrap();

    let session = slot.require().unwrap();
    assert_eq!(session.access_token, "jwt");
    assert!(session.refresh_token.is_none());
}

#[tokio::test]
async fn test_login_failure_keeps_existing_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad user or password"))
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    let err = h.client.login(&mut slot, "tobo", "wrong").await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(slot.require().unwrap().access_token, ACCESS_TOKEN);
}

#[tokio::test]
async fn test_login_replaces_previous_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 8,
            "login_id": "login-8",
            "access_token": "access-2"
        })))
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    h.client.login(&mut slot, "other", "pw").await.unwrap();

    let session = slot.require().unwrap();
    assert_eq!(session.user_id, 8);
    assert_eq!(session.user_name, "other");
    // No field of the old login survives
    assert!(session.refresh_token.is_none());
}

#[tokio::test]
async fn test_login_rejects_empty_user_without_request() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut slot = SessionSlot::empty();
    let err = h.client.login(&mut slot, "", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "user", .. }));
}

// ----------------------------------------------------------------------------
// Logout
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_logout_ends_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/logout"))
        .and(header("Authorization", BEARER_BASE64))
        .and(body_json(json!({"access_token": ACCESS_TOKEN})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    let ended = h.client.logout(&mut slot).await.unwrap().unwrap();

    assert_eq!(ended.user_id, 7);
    assert_eq!(slot.status(), AuthStatus::NotLoggedIn);
}

#[tokio::test]
async fn test_logout_failure_still_ends_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    let err = h.client.logout(&mut slot).await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(!slot.is_authenticated());
}

// ----------------------------------------------------------------------------
// Account deletion and lookup
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_account_ends_session() {
    let h = TestHarness::new().await;
    Mock::given(method("DELETE"))
        .and(path("/greeter/auth/users/7"))
        .and(header("Authorization", BEARER_BASE64))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    let ended = h.client.delete_account(&mut slot).await.unwrap();

    assert_eq!(ended.user_id, 7);
    assert!(!slot.is_authenticated());
}

#[tokio::test]
async fn test_delete_account_failure_keeps_session() {
    let h = TestHarness::new().await;
    Mock::given(method("DELETE"))
        .and(path("/greeter/auth/users/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let mut slot = logged_in();
    let err = h.client.delete_account(&mut slot).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(slot.is_authenticated());
}

#[tokio::test]
async fn test_delete_account_requires_session() {
    let h = TestHarness::new().await;
    let mut slot = SessionSlot::empty();
    let err = h.client.delete_account(&mut slot).await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
}

#[tokio::test]
async fn test_tokens_only_login_never_addresses_an_account() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a",
            "refresh_token": "r"
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(path_regex(r"/users/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut slot = SessionSlot::empty();
    let session = h.client.login(&mut slot, "tobo", "obot").await.unwrap();
    assert_eq!(session.user_id, 0);

    let err = h.client.delete_account(&mut slot).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "user id", .. }));
    assert!(slot.is_authenticated());

    let err = h.client.preference(&slot).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "user id", .. }));

    let err = h.client.set_preference(&slot, "fr").await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "user id", .. }));
}

#[tokio::test]
async fn test_user_info_and_list() {
    let h = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/greeter/auth/users/7"))
        .and(header("Authorization", BEARER_BASE64))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": 7, "user_name": "tobo"})),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/greeter/auth/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_ids": [1, 7]})))
        .mount(&h.server)
        .await;

    let slot = logged_in();
    let info = h.client.user_info(&slot, 7).await.unwrap();
    assert_eq!(info.user_name, "tobo");

    let users = h.client.list_users(&slot).await.unwrap();
    assert_eq!(users.user_ids, vec![1, 7]);
}

#[tokio::test]
async fn test_raw_token_encoding() {
    let h = TestHarness::with_encoding(TokenEncoding::Raw).await;
    Mock::given(method("GET"))
        .and(path("/greeter/auth/users"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_ids": []})))
        .expect(1)
        .mount(&h.server)
        .await;

    let users = h.client.list_users(&logged_in()).await.unwrap();
    assert!(users.user_ids.is_empty());
}
