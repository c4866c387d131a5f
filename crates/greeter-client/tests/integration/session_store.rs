//! A session survives a store round trip between two client runs.

use greeter_client::{FileSessionStore, SessionSlot, SessionStore};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{BEARER_BASE64, TestHarness};

#[tokio::test]
async fn test_login_persist_reload_greet_logout() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 7,
            "login_id": "login-7",
            "access_token": "access-1"
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/greeter/messages/greetings/en"))
        .and(header("Authorization", BEARER_BASE64))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"language": "en", "message": "Hello tobo"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/greeter/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    // First run: log in and persist
    let mut slot = store.load().unwrap();
    h.client.login(&mut slot, "tobo", "obot").await.unwrap();
    store.save(&slot).unwrap();

    // Second run: reload and use the stored token
    let mut slot = store.load().unwrap();
    let greeting = h.client.greeting(&slot, "en").await.unwrap();
    assert_eq!(greeting.message, "Hello tobo");

    h.client.logout(&mut slot).await.unwrap();
    store.save(&slot).unwrap();

    // Third run: nothing stored
    assert_eq!(store.load().unwrap(), SessionSlot::empty());
}
