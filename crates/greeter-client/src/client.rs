//! Greeter client implementation
//!
//! Every operation issues exactly one HTTP request. Operations that need a
//! login take the [`SessionSlot`] explicitly; login, logout and account
//! deletion take it mutably because they start or end the session.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::authorization_value;
use crate::config::ClientConfig;
use crate::models::{
    Credentials, Greeting, LanguagePreference, Languages, LoginResponse, LogoutRequest,
    PreferenceUpdate, Registration, UserInfo, UserList,
};
use crate::session::{Session, SessionSlot};
use crate::{Error, Result};

/// Client for the login and greetings services.
#[derive(Clone, Debug)]
pub struct GreeterClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GreeterClient {
    /// Create a client for a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("greeter-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Login service
    // ------------------------------------------------------------------------

    /// Create an account.
    ///
    /// Services that answer with an empty body get a [`UserInfo`] echoing
    /// the requested name with id 0.
    pub async fn register(&self, registration: &Registration) -> Result<UserInfo> {
        let url = self.config.auth_url(&["users"])?;
        let resp = self
            .send(self.http.post(url).json(registration.credentials()))
            .await?;
        let info = read_optional_json::<UserInfo>(resp)
            .await?
            .unwrap_or_else(|| UserInfo {
                user_id: 0,
                user_name: registration.user_name().to_string(),
            });
        tracing::info!(user_id = info.user_id, user = %info.user_name, "registered");
        Ok(info)
    }

    /// Log in and install the new session in `slot`.
    ///
    /// A session already in the slot is replaced only once the service has
    /// accepted the credentials; on failure the slot is left untouched.
    pub async fn login<'s>(
        &self,
        slot: &'s mut SessionSlot,
        user: &str,
        password: &str,
    ) -> Result<&'s Session> {
        if user.is_empty() {
            return Err(Error::validation("user", "must not be empty"));
        }
        let url = self.config.auth_url(&["login"])?;
        let resp = self
            .send(self.http.post(url).json(&Credentials::new(user, password)))
            .await?;
        let login: LoginResponse = read_json(resp).await?;

        if let Some(previous) = slot.begin(Session::from_login(user, login)) {
            tracing::warn!(
                user_id = previous.user_id,
                "replaced a session that was never logged out"
            );
        }
        slot.require()
    }

    /// End the current session.
    ///
    /// The slot is emptied before the service is told, so a failing logout
    /// call still leaves the client logged out. Returns `None` without any
    /// request when nobody is logged in.
    pub async fn logout(&self, slot: &mut SessionSlot) -> Result<Option<Session>> {
        let Some(session) = slot.end() else {
            tracing::debug!("logout without a session");
            return Ok(None);
        };

        let url = self.config.auth_url(&["logout"])?;
        let body = LogoutRequest {
            access_token: session.access_token.clone(),
        };
        let request = self.authorized(self.http.post(url).json(&body), &session)?;
        if let Err(e) = self.send(request).await {
            tracing::warn!(user_id = session.user_id, error = %e, "service rejected logout");
            return Err(e);
        }
        Ok(Some(session))
    }

    /// Delete the logged-in account and end its session.
    pub async fn delete_account(&self, slot: &mut SessionSlot) -> Result<Session> {
        let session = slot.require()?;
        let id = session.account_id()?.to_string();
        let url = self.config.auth_url(&["users", &id])?;
        let request = self.authorized(self.http.delete(url), session)?;
        self.send(request).await?;

        slot.end().ok_or(Error::NotLoggedIn)
    }

    /// Look up an account by id.
    pub async fn user_info(&self, slot: &SessionSlot, user_id: u64) -> Result<UserInfo> {
        let id = user_id.to_string();
        self.get_json(slot, self.config.auth_url(&["users", &id])?)
            .await
    }

    /// List all account ids.
    pub async fn list_users(&self, slot: &SessionSlot) -> Result<UserList> {
        self.get_json(slot, self.config.auth_url(&["users"])?).await
    }

    // ------------------------------------------------------------------------
    // Greetings service
    // ------------------------------------------------------------------------

    /// Languages a greeting can be requested in.
    pub async fn languages(&self, slot: &SessionSlot) -> Result<Languages> {
        self.get_json(slot, self.config.greeter_url(&["greetings"])?)
            .await
    }

    /// Greeting for the logged-in user in `language`.
    pub async fn greeting(&self, slot: &SessionSlot, language: &str) -> Result<Greeting> {
        let language = non_empty_language(language)?;
        self.get_json(slot, self.config.greeter_url(&["greetings", language])?)
            .await
    }

    /// Stored language preference of the logged-in user.
    pub async fn preference(&self, slot: &SessionSlot) -> Result<LanguagePreference> {
        let id = slot.require()?.account_id()?.to_string();
        self.get_json(slot, self.config.greeter_url(&["users", &id])?)
            .await
    }

    /// Change the language preference of the logged-in user.
    ///
    /// Services that answer with an empty body get the update echoed back.
    pub async fn set_preference(
        &self,
        slot: &SessionSlot,
        language: &str,
    ) -> Result<LanguagePreference> {
        let session = slot.require()?;
        let language = non_empty_language(language)?;
        let id = session.account_id()?.to_string();
        let url = self.config.greeter_url(&["users", &id])?;
        let body = PreferenceUpdate {
            language: language.to_string(),
        };
        let resp = self
            .send(self.authorized(self.http.put(url).json(&body), session)?)
            .await?;

        Ok(read_optional_json::<LanguagePreference>(resp)
            .await?
            .unwrap_or_else(|| LanguagePreference {
                user_id: session.user_id,
                user_name: session.user_name.clone(),
                language: body.language,
            }))
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(
        &self,
        slot: &SessionSlot,
        url: reqwest::Url,
    ) -> Result<T> {
        let session = slot.require()?;
        let request = self.authorized(self.http.request(Method::GET, url), session)?;
        read_json(self.send(request).await?).await
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> Result<RequestBuilder> {
        let value = authorization_value(&session.access_token, self.config.token_encoding)?;
        Ok(builder.header(AUTHORIZATION, value))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "request");

        let resp = self.http.execute(request).await?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "response");

        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn non_empty_language(language: &str) -> Result<&str> {
    let language = language.trim();
    if language.is_empty() {
        return Err(Error::validation("language", "must not be empty"));
    }
    Ok(language)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

async fn read_optional_json<T: DeserializeOwned>(resp: Response) -> Result<Option<T>> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}
