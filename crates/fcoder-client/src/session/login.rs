use fcoder_validate::{
    fields, handle_server_validation_errors, messages, validate_login_form, LoginFormData,
    ValidationError,
};
use std::fmt;
use std::str::FromStr;

use super::{race, transport_failure, FormLifetime, Shared, SubmitOutcome, UnknownField};
use crate::auth::{AuthApi, LoginSuccess};

/// Inputs of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Username,
    Password,
}

impl LoginField {
    pub const ALL: [LoginField; 2] = [LoginField::Username, LoginField::Password];

    pub fn name(&self) -> &'static str {
        match self {
            LoginField::Username => fields::USERNAME,
            LoginField::Password => fields::PASSWORD,
        }
    }
}

impl FromStr for LoginField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoginField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interactive state of the login form.
#[derive(Debug, Clone, Default)]
pub struct LoginSession {
    state: Shared<LoginFormData>,
    lifetime: FormLifetime,
}

impl LoginSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifetime(&self) -> FormLifetime {
        self.lifetime.clone()
    }

    pub fn data(&self) -> LoginFormData {
        self.state.lock().data.clone()
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.state.errors()
    }

    pub fn field_error(&self, field: LoginField) -> Option<String> {
        self.state.field_error(field.name())
    }

    pub fn general_error(&self) -> Option<String> {
        self.state.field_error(fields::GENERAL)
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn is_touched(&self, field: LoginField) -> bool {
        self.state.is_touched(field.name())
    }

    /// Record an edit, validating it if the field was touched before or
    /// has just been cleared.
    pub fn change(&self, field: LoginField, value: &str) {
        let mut state = self.state.lock();

        match field {
            LoginField::Username => state.data.username = value.to_string(),
            LoginField::Password => state.data.password = value.to_string(),
        }
        let was_touched = state.touch(field.name());

        if was_touched || value.is_empty() {
            let result = validate_login_form(&state.data);
            state.revalidate(field.name(), &result);
        }
    }

    pub fn blur(&self, field: LoginField) {
        let mut state = self.state.lock();

        state.touch(field.name());
        let result = validate_login_form(&state.data);
        state.revalidate(field.name(), &result);
    }

    /// Validate and, if the form passes, log in. Success yields the
    /// session token issued by the backend.
    pub async fn submit<A: AuthApi + ?Sized>(&self, api: &A) -> SubmitOutcome<String> {
        if self.lifetime.is_ended() {
            return SubmitOutcome::Abandoned;
        }

        let form = {
            let mut state = self.state.lock();
            if state.busy {
                tracing::debug!("login submit ignored while busy");
                return SubmitOutcome::Busy;
            }

            for field in LoginField::ALL {
                state.touch(field.name());
            }

            let validation = validate_login_form(&state.data);
            if !validation.is_valid() {
                let errors = validation.into_errors();
                state.errors = errors.clone();
                return SubmitOutcome::Rejected(errors);
            }

            state.busy = true;
            state.errors.clear();
            state.data.clone()
        };

        tracing::debug!(username = %form.username, "submitting login");
        let call = api.login(&form.username, &form.password);
        let Some(response) = race(&self.lifetime, call).await else {
            tracing::debug!("login response discarded after form closed");
            self.state.release();
            return SubmitOutcome::Abandoned;
        };

        let errors = match response {
            Ok(response) if response.is_success() => match response.json::<LoginSuccess>() {
                Ok(success) => {
                    tracing::info!(username = %form.username, "logged in");
                    self.state.finish(Vec::new());
                    return SubmitOutcome::Success(success.token);
                }
                Err(err) => transport_failure(&err),
            },
            Ok(response) if matches!(response.status, 401 | 403) => {
                tracing::debug!(status = response.status, "credentials rejected");
                vec![ValidationError::general(messages::LOGIN_FAILED)]
            }
            Ok(response) => {
                let mut errors = handle_server_validation_errors(&response.server_error());
                if errors.is_empty() {
                    errors.push(ValidationError::general(messages::GENERAL_ERROR));
                }
                errors
            }
            Err(err) => transport_failure(&err),
        };

        self.state.finish(errors.clone());
        SubmitOutcome::Failed(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiResponse;
    use crate::error::{ClientError, Result};
    use crate::payload::SignupPayload;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeApi {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl FakeApi {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeApi {
        async fn login(&self, username: &str, password: &str) -> Result<ApiResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((username.to_string(), password.to_string()));
            Ok(ApiResponse::new(self.status, self.body))
        }

        async fn signup(&self, _: &SignupPayload) -> Result<ApiResponse> {
            unreachable!("login form never signs up")
        }
    }

    struct OfflineApi;

    #[async_trait]
    impl AuthApi for OfflineApi {
        async fn login(&self, _: &str, _: &str) -> Result<ApiResponse> {
            Err(ClientError::Timeout)
        }

        async fn signup(&self, _: &SignupPayload) -> Result<ApiResponse> {
            Err(ClientError::Timeout)
        }
    }

    fn filled() -> LoginSession {
        let session = LoginSession::new();
        session.change(LoginField::Username, "fcoder_member");
        session.change(LoginField::Password, "whatever");
        session
    }

    #[test]
    fn field_names() {
        assert_eq!("password".parse::<LoginField>(), Ok(LoginField::Password));
        assert!("email".parse::<LoginField>().is_err());
    }

    #[test]
    fn password_only_needs_presence() {
        let session = LoginSession::new();
        session.change(LoginField::Password, "x");
        session.blur(LoginField::Password);
        assert_eq!(session.field_error(LoginField::Password), None);

        session.change(LoginField::Password, "");
        assert_eq!(
            session.field_error(LoginField::Password),
            Some(messages::required(messages::labels::PASSWORD))
        );
    }

    #[test]
    fn username_format_checked_once_touched() {
        let session = LoginSession::new();
        session.change(LoginField::Username, "ab");
        assert_eq!(session.field_error(LoginField::Username), None);

        session.blur(LoginField::Username);
        assert_eq!(
            session.field_error(LoginField::Username).as_deref(),
            Some(messages::USERNAME_INVALID)
        );
    }

    #[tokio::test]
    async fn empty_form_is_rejected_locally() {
        let api = FakeApi::new(200, r#"{"token": "t"}"#);
        let session = LoginSession::new();

        let outcome = session.submit(&api).await;
        assert_eq!(outcome.errors().len(), 2);
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(api.seen.lock().unwrap().is_empty());
        assert!(session.is_touched(LoginField::Username));
        assert!(session.is_touched(LoginField::Password));
    }

    #[tokio::test]
    async fn success_returns_token() {
        let api = FakeApi::new(200, r#"{"token": "jwt-token"}"#);
        let session = filled();

        let outcome = session.submit(&api).await;
        assert_eq!(outcome, SubmitOutcome::Success("jwt-token".to_string()));
        assert_eq!(
            api.seen.lock().unwrap().as_slice(),
            [("fcoder_member".to_string(), "whatever".to_string())]
        );
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_wrong_credentials() {
        for status in [401, 403] {
            let api = FakeApi::new(status, r#"{"message": "Username already exists"}"#);
            let session = filled();

            session.submit(&api).await;
            assert_eq!(
                session.errors(),
                vec![ValidationError::general(messages::LOGIN_FAILED)]
            );
        }
    }

    #[tokio::test]
    async fn other_failures_use_the_translator() {
        let api = FakeApi::new(400, r#"{"message": "Failed to login: locked"}"#);
        let session = filled();

        session.submit(&api).await;
        assert_eq!(
            session.general_error().as_deref(),
            Some(messages::LOGIN_FAILED_CHECK_INFO)
        );
    }

    #[tokio::test]
    async fn undecodable_success_body() {
        let api = FakeApi::new(200, "<html>");
        let session = filled();

        let outcome = session.submit(&api).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(vec![ValidationError::general(messages::GENERAL_ERROR)])
        );
    }

    #[tokio::test]
    async fn timeout_is_a_network_error() {
        let session = filled();

        session.submit(&OfflineApi).await;
        assert_eq!(session.general_error().as_deref(), Some(messages::NETWORK_ERROR));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn closed_form_does_not_submit() {
        let api = FakeApi::new(200, r#"{"token": "t"}"#);
        let session = filled();
        session.lifetime().end();

        assert_eq!(session.submit(&api).await, SubmitOutcome::Abandoned);
        assert!(api.seen.lock().unwrap().is_empty());
    }

    struct HangingApi;

    #[async_trait]
    impl AuthApi for HangingApi {
        async fn login(&self, _: &str, _: &str) -> Result<ApiResponse> {
            std::future::pending().await
        }

        async fn signup(&self, _: &SignupPayload) -> Result<ApiResponse> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn closing_mid_request_releases_busy() {
        let session = filled();
        let lifetime = session.lifetime();

        let (outcome, ()) = tokio::join!(session.submit(&HangingApi), async {
            while !session.is_busy() {
                tokio::task::yield_now().await;
            }
            lifetime.end();
        });

        assert_eq!(outcome, SubmitOutcome::Abandoned);
        assert!(!session.is_busy());
        assert!(session.errors().is_empty());
    }
}
