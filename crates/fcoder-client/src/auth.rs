//! Authentication endpoints of the FCoder backend.

use async_trait::async_trait;
use bytes::Bytes;
use fcoder_validate::ServerErrorResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::payload::SignupPayload;

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/accounts/members/register/full";

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Read the body as a backend failure payload; never fails.
    pub fn server_error(&self) -> ServerErrorResponse {
        ServerErrorResponse::from_slice(&self.body)
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The two authentication calls a form can make.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<ApiResponse>;

    async fn signup(&self, payload: &SignupPayload) -> Result<ApiResponse>;
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base: String,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base: config.api_base(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}{}", self.base, path);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(url = %url, error = %err, "request failed");
                err
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(
            url = %url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<ApiResponse> {
        self.post_json(LOGIN_PATH, &LoginRequest { username, password }).await
    }

    async fn signup(&self, payload: &SignupPayload) -> Result<ApiResponse> {
        self.post_json(SIGNUP_PATH, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::ClientError;
    use fcoder_validate::ServerFieldError;
    use std::time::Duration;

    #[test]
    fn success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(201, "").is_success());
        assert!(!ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(401, "").is_success());
    }

    #[test]
    fn token_body() {
        let response = ApiResponse::new(200, r#"{"token": "abc.def"}"#);
        let success: LoginSuccess = response.json().unwrap();
        assert_eq!(success.token, "abc.def");

        assert!(ApiResponse::new(200, "ok").json::<LoginSuccess>().is_err());
    }

    #[test]
    fn failure_body() {
        let response = ApiResponse::new(
            400,
            r#"{"validationErrors": [{"field": "email", "message": "taken"}]}"#,
        );
        assert_eq!(
            response.server_error().validation_errors,
            Some(vec![ServerFieldError::new("email", "taken")])
        );
        assert_eq!(
            ApiResponse::new(502, "Bad Gateway").server_error(),
            ServerErrorResponse::default()
        );
    }

    #[test]
    fn base_url_from_config() {
        let api = HttpAuthApi::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn zero_timeout_config_is_refused() {
        let config = ClientConfig::new("http://localhost:8080").with_timeout(Duration::ZERO);
        assert!(matches!(
            HttpAuthApi::new(&config),
            Err(ClientError::Config(ConfigError::ZeroTimeout))
        ));
    }
}
