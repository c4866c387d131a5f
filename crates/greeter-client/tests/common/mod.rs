//! Common test utilities and harness for greeter-client integration tests.

use greeter_client::{ClientConfig, GreeterClient, Session, SessionSlot, TokenEncoding};
use wiremock::MockServer;

/// Access token of the session produced by [`logged_in`].
pub const ACCESS_TOKEN: &str = "access-1";

/// `Authorization` value for [`ACCESS_TOKEN`] under base64 encoding.
pub const BEARER_BASE64: &str = "Bearer YWNjZXNzLTE=";

/// A mock service and a client pointed at it.
pub struct TestHarness {
    /// Mock login + greetings service
    pub server: MockServer,
    /// Client under test
    pub client: GreeterClient,
}

impl TestHarness {
    /// Start a mock server with the default (base64) token encoding.
    pub async fn new() -> Self {
        Self::with_encoding(TokenEncoding::Base64).await
    }

    /// Start a mock server with the given token encoding.
    pub async fn with_encoding(token_encoding: TokenEncoding) -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig {
            token_encoding,
            timeout_secs: 5,
            ..ClientConfig::with_base_url(server.uri())
        };
        let client = GreeterClient::new(config).expect("mock server URI is a valid base URL");
        Self { server, client }
    }
}

/// A slot holding a session for user 7.
pub fn logged_in() -> SessionSlot {
    SessionSlot::with_session(Session::new(
        7,
        "login-7",
        "tobo",
        ACCESS_TOKEN,
        Some("refresh-1".to_string()),
    ))
}
