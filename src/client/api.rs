/**
 * Client REST Companion
 *
 * Thin reqwest wrapper for the native client: logs in to obtain the session
 * token the show channel rides on, and reads or writes show documents over
 * the same HTTP surface the browser uses. The held token travels as the
 * session cookie on every request.
 */
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::shared::protocol::SESSION_COOKIE;
use crate::shared::staff::StaffProfile;

/// Errors from the REST companion
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response
    #[error("Request failed with {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A call that needs a session was made before `login`
    #[error("Not logged in")]
    NotLoggedIn,
}

/// HTTP client holding one staff session
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a client against one server, not yet logged in
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server base URL, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session_token: None,
        }
    }

    /// Session token for handing to a show channel
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Log in and hold the returned session
    ///
    /// The token is read from the response body; the Set-Cookie header on
    /// the same response carries the identical value for browser clients.
    ///
    /// # Errors
    ///
    /// * `Http` with 401 - unknown username or wrong access key
    /// * `UnexpectedResponse` - body without a token or profile
    pub async fn login(
        &mut self,
        username: &str,
        access_key: &str,
    ) -> Result<StaffProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "access_key": access_key }))
            .send()
            .await?;
        let body = Self::expect_success(response).await?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::UnexpectedResponse("login body carries no token".to_string())
            })?
            .to_string();
        let staff: StaffProfile =
            serde_json::from_value(body.get("staff").cloned().unwrap_or(Value::Null)).map_err(
                |e| ClientError::UnexpectedResponse(format!("bad staff profile: {}", e)),
            )?;

        tracing::info!("[Client] Logged in as {} ({})", staff.name, staff.role);
        self.session_token = Some(token);
        Ok(staff)
    }

    /// Drop the held session, telling the server to clear its cookie
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let cookie = self.cookie()?;
        let response = self
            .http
            .post(self.url("/api/auth/logout"))
            .header(COOKIE, cookie)
            .send()
            .await?;
        Self::expect_success(response).await?;
        self.session_token = None;
        Ok(())
    }

    /// GET one API resource as JSON
    pub async fn fetch(&self, path: &str) -> Result<Value, ClientError> {
        let cookie = self.cookie()?;
        let response = self
            .http
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// PUT one API resource
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let cookie = self.cookie()?;
        let response = self
            .http
            .put(self.url(path))
            .header(COOKIE, cookie)
            .json(body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// DELETE one API resource
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let cookie = self.cookie()?;
        let response = self
            .http
            .delete(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// Full URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Cookie header value for the held session
    fn cookie(&self) -> Result<String, ClientError> {
        let token = self
            .session_token
            .as_deref()
            .ok_or(ClientError::NotLoggedIn)?;
        Ok(format!("{}={}", SESSION_COOKIE, token))
    }

    /// Turn a non-success response into a readable error.
    async fn expect_success(response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Http { status, body });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.url("/api/shows"), "http://127.0.0.1:3000/api/shows");
    }

    #[test]
    fn test_calls_before_login_are_refused() {
        let client = ApiClient::new("http://127.0.0.1:3000");
        match client.cookie() {
            Err(ClientError::NotLoggedIn) => {}
            other => panic!("Expected NotLoggedIn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_cookie_header_uses_session_cookie_name() {
        let mut client = ApiClient::new("http://127.0.0.1:3000");
        client.session_token = Some("tok123".to_string());
        assert_eq!(client.cookie().unwrap(), "stagelink_session=tok123");
    }
}
