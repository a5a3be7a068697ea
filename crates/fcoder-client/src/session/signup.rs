use chrono::{Local, NaiveDate};
use fcoder_validate::{
    fields, handle_server_validation_errors, messages, validate_signup_form_on, SignupFormData,
    ValidationError, ValidationResult,
};
use std::fmt;
use std::str::FromStr;

use super::{race, transport_failure, FormLifetime, Shared, SubmitOutcome, UnknownField};
use crate::auth::AuthApi;
use crate::payload::SignupPayload;

/// Inputs of the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignupField {
    Username,
    Password,
    RePassword,
    Email,
    Github,
    StudentCode,
    FullName,
    Gender,
    Phone,
    Major,
    Birthday,
    ProfileImg,
    CurrentTerm,
}

impl SignupField {
    pub const ALL: [SignupField; 13] = [
        SignupField::Username,
        SignupField::Password,
        SignupField::RePassword,
        SignupField::Email,
        SignupField::Github,
        SignupField::StudentCode,
        SignupField::FullName,
        SignupField::Gender,
        SignupField::Phone,
        SignupField::Major,
        SignupField::Birthday,
        SignupField::ProfileImg,
        SignupField::CurrentTerm,
    ];

    /// Name used in error entries and by the backend.
    pub fn name(&self) -> &'static str {
        match self {
            SignupField::Username => fields::USERNAME,
            SignupField::Password => fields::PASSWORD,
            SignupField::RePassword => fields::RE_PASSWORD,
            SignupField::Email => fields::EMAIL,
            SignupField::Github => fields::GITHUB,
            SignupField::StudentCode => fields::STUDENT_CODE,
            SignupField::FullName => fields::FULL_NAME,
            SignupField::Gender => fields::GENDER,
            SignupField::Phone => fields::PHONE,
            SignupField::Major => fields::MAJOR,
            SignupField::Birthday => fields::BIRTHDAY,
            SignupField::ProfileImg => fields::PROFILE_IMG,
            SignupField::CurrentTerm => fields::CURRENT_TERM,
        }
    }
}

impl FromStr for SignupField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignupField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl fmt::Display for SignupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The backend created the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registered;

/// Blank or non-numeric term text counts as "not entered". Only whole
/// integers parse; `"5.0"` and `"5abc"` are not read as 5.
fn parse_term(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

fn store(form: &mut SignupFormData, field: SignupField, value: &str) {
    let text = Some(value.to_string());
    match field {
        SignupField::Username => form.username = text,
        SignupField::Password => form.password = text,
        SignupField::RePassword => form.re_password = text,
        SignupField::Email => form.email = text,
        SignupField::Github => form.github = text,
        SignupField::StudentCode => form.student_code = text,
        SignupField::FullName => form.full_name = text,
        SignupField::Gender => form.gender = text,
        SignupField::Phone => form.phone = text,
        SignupField::Major => form.major = text,
        SignupField::Birthday => form.birthday = text,
        SignupField::ProfileImg => form.profile_img = text,
        SignupField::CurrentTerm => form.current_term = parse_term(value),
    }
}

/// Interactive state of the signup form.
#[derive(Debug, Clone)]
pub struct SignupSession {
    state: Shared<SignupFormData>,
    lifetime: FormLifetime,
    today: Option<NaiveDate>,
}

impl Default for SignupSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupSession {
    /// A freshly mounted form with the default selections.
    pub fn new() -> Self {
        Self::with_data(SignupFormData::initial())
    }

    pub fn with_data(data: SignupFormData) -> Self {
        Self {
            state: Shared::new(data),
            lifetime: FormLifetime::new(),
            today: None,
        }
    }

    /// Pin the date used for the age check instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn lifetime(&self) -> FormLifetime {
        self.lifetime.clone()
    }

    pub fn data(&self) -> SignupFormData {
        self.state.lock().data.clone()
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.state.errors()
    }

    pub fn field_error(&self, field: SignupField) -> Option<String> {
        self.state.field_error(field.name())
    }

    /// Errors not tied to an input, shown above the form.
    pub fn general_error(&self) -> Option<String> {
        self.state.field_error(fields::GENERAL)
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn is_touched(&self, field: SignupField) -> bool {
        self.state.is_touched(field.name())
    }

    /// Record an edit. Validates the field if it was already touched or
    /// has just been cleared; editing the password also re-checks a
    /// touched confirmation.
    pub fn change(&self, field: SignupField, value: &str) {
        let today = self.today();
        let mut state = self.state.lock();

        store(&mut state.data, field, value);
        let was_touched = state.touch(field.name());

        if !was_touched && !value.is_empty() {
            return;
        }

        let result = validate_signup_form_on(&state.data, today);
        state.revalidate(field.name(), &result);
        if field == SignupField::Password && state.touched.contains(fields::RE_PASSWORD) {
            state.revalidate(fields::RE_PASSWORD, &result);
        }
    }

    /// The input lost focus: mark it touched and validate it.
    pub fn blur(&self, field: SignupField) {
        let today = self.today();
        let mut state = self.state.lock();

        state.touch(field.name());
        let result = validate_signup_form_on(&state.data, today);
        state.revalidate(field.name(), &result);
    }

    /// Validate everything and, if the form passes, register the account.
    pub async fn submit<A: AuthApi + ?Sized>(&self, api: &A) -> SubmitOutcome<Registered> {
        if self.lifetime.is_ended() {
            return SubmitOutcome::Abandoned;
        }

        let payload = {
            let mut state = self.state.lock();
            if state.busy {
                tracing::debug!("signup submit ignored while busy");
                return SubmitOutcome::Busy;
            }

            for field in SignupField::ALL {
                state.touch(field.name());
            }

            match SignupPayload::from_form(&state.data, self.today()) {
                Ok(payload) => {
                    state.busy = true;
                    state.errors.clear();
                    payload
                }
                Err(validation) => {
                    let errors = validation.into_errors();
                    tracing::debug!(errors = errors.len(), "signup form rejected");
                    state.errors = errors.clone();
                    return SubmitOutcome::Rejected(errors);
                }
            }
        };

        tracing::debug!(username = %payload.username, "submitting signup");
        let Some(response) = race(&self.lifetime, api.signup(&payload)).await else {
            tracing::debug!("signup response discarded after form closed");
            self.state.release();
            return SubmitOutcome::Abandoned;
        };

        let errors = match response {
            Ok(response) if response.is_success() => {
                tracing::info!(username = %payload.username, "member registered");
                self.state.finish(Vec::new());
                return SubmitOutcome::Success(Registered);
            }
            Ok(response) => {
                let mut errors = handle_server_validation_errors(&response.server_error());
                if errors.is_empty() {
                    errors.push(ValidationError::general(messages::GENERAL_ERROR));
                }
                tracing::debug!(status = response.status, errors = errors.len(), "signup refused");
                errors
            }
            Err(err) => transport_failure(&err),
        };

        self.state.finish(errors.clone());
        SubmitOutcome::Failed(errors)
    }

    /// Validate the current data without touching session state.
    pub fn validate(&self) -> ValidationResult {
        validate_signup_form_on(&self.state.lock().data, self.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiResponse;
    use crate::error::{ClientError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeApi {
        response: fn() -> Result<ApiResponse>,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn new(response: fn() -> Result<ApiResponse>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeApi {
        async fn login(&self, _: &str, _: &str) -> Result<ApiResponse> {
            unreachable!("signup form never logs in")
        }

        async fn signup(&self, _: &SignupPayload) -> Result<ApiResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.response)()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn session() -> SignupSession {
        SignupSession::new().with_today(today())
    }

    fn filled() -> SignupSession {
        let session = session();
        session.change(SignupField::Username, "le_an");
        session.change(SignupField::Email, "an.le@fpt.edu.vn");
        session.change(SignupField::Password, "Fcoder2024");
        session.change(SignupField::RePassword, "Fcoder2024");
        session.change(SignupField::FullName, "Lê An");
        session
    }

    #[test]
    fn field_names_round_trip() {
        for field in SignupField::ALL {
            assert_eq!(field.name().parse::<SignupField>(), Ok(field));
        }
        assert_eq!(
            "nickname".parse::<SignupField>(),
            Err(UnknownField("nickname".into()))
        );
        assert_eq!(SignupField::StudentCode.to_string(), "studentCode");
    }

    #[test]
    fn first_edit_is_not_validated() {
        let session = session();
        session.change(SignupField::Email, "a");
        assert!(session.is_touched(SignupField::Email));
        assert_eq!(session.field_error(SignupField::Email), None);

        session.change(SignupField::Email, "ab");
        assert_eq!(
            session.field_error(SignupField::Email).as_deref(),
            Some(messages::EMAIL_INVALID)
        );
    }

    #[test]
    fn clearing_a_field_validates_it() {
        let session = session();
        session.change(SignupField::FullName, "");
        assert_eq!(
            session.field_error(SignupField::FullName),
            Some(messages::required(messages::labels::FULL_NAME))
        );
    }

    #[test]
    fn blank_optional_fields_stay_clean() {
        let session = session();
        session.blur(SignupField::Phone);
        session.change(SignupField::Github, "");
        session.change(SignupField::StudentCode, "   ");
        assert!(session.errors().is_empty());
    }

    #[test]
    fn blur_validates_untouched_field() {
        let session = session();
        session.blur(SignupField::Username);
        assert_eq!(
            session.field_error(SignupField::Username),
            Some(messages::required(messages::labels::USERNAME))
        );
    }

    #[test]
    fn password_change_rechecks_confirmation() {
        let session = filled();
        assert!(session.errors().is_empty());

        session.change(SignupField::Password, "Fcoder2025");
        assert_eq!(
            session.field_error(SignupField::RePassword).as_deref(),
            Some(messages::PASSWORD_MISMATCH)
        );

        session.change(SignupField::RePassword, "Fcoder2025");
        assert_eq!(session.field_error(SignupField::RePassword), None);
    }

    #[test]
    fn current_term_text_is_parsed() {
        let session = session();
        session.change(SignupField::CurrentTerm, "12");
        session.change(SignupField::CurrentTerm, "12");
        assert_eq!(session.data().current_term, Some(12));
        assert_eq!(
            session.field_error(SignupField::CurrentTerm).as_deref(),
            Some(messages::CURRENT_TERM_INVALID)
        );

        session.change(SignupField::CurrentTerm, "abc");
        assert_eq!(session.data().current_term, None);
        assert_eq!(
            session.field_error(SignupField::CurrentTerm),
            Some(messages::required(messages::labels::CURRENT_TERM))
        );
    }

    #[test]
    fn edits_leave_other_errors_alone() {
        let session = session();
        session.blur(SignupField::Username);
        session.blur(SignupField::Email);
        session.change(SignupField::Email, "an.le@fpt.edu.vn");

        assert!(session.field_error(SignupField::Username).is_some());
        assert_eq!(session.field_error(SignupField::Email), None);
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let api = FakeApi::new(|| Ok(ApiResponse::new(200, "{}")));
        let session = session();

        let outcome = session.submit(&api).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.errors(), outcome.errors().to_vec());
        assert!(SignupField::ALL.iter().all(|f| session.is_touched(*f)));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn successful_registration() {
        let api = FakeApi::new(|| Ok(ApiResponse::new(201, "{}")));
        let session = filled();

        assert_eq!(session.submit(&api).await, SubmitOutcome::Success(Registered));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(session.errors().is_empty());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn server_errors_are_translated() {
        let api = FakeApi::new(|| {
            Ok(ApiResponse::new(
                400,
                r#"{"message": "username already exists", "validationErrors": [{"field": "email", "message": "taken"}]}"#,
            ))
        });
        let session = filled();

        let outcome = session.submit(&api).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(vec![
                ValidationError::new("username", "username already exists"),
                ValidationError::new("email", "taken"),
            ])
        );
        assert_eq!(session.field_error(SignupField::Email).as_deref(), Some("taken"));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn empty_failure_body_gets_general_error() {
        let api = FakeApi::new(|| Ok(ApiResponse::new(500, "")));
        let session = filled();

        session.submit(&api).await;
        assert_eq!(session.general_error().as_deref(), Some(messages::GENERAL_ERROR));
    }

    #[tokio::test]
    async fn network_failure() {
        let api = FakeApi::new(|| Err(ClientError::Connect("refused".into())));
        let session = filled();

        let outcome = session.submit(&api).await;
        assert_eq!(
            outcome.errors().to_vec(),
            vec![ValidationError::general(messages::NETWORK_ERROR)]
        );
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn busy_session_ignores_submit() {
        let api = FakeApi::new(|| Ok(ApiResponse::new(201, "{}")));
        let session = filled();
        session.state.lock().busy = true;

        assert_eq!(session.submit(&api).await, SubmitOutcome::Busy);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    struct SlowApi;

    #[async_trait]
    impl AuthApi for SlowApi {
        async fn login(&self, _: &str, _: &str) -> Result<ApiResponse> {
            unreachable!()
        }

        async fn signup(&self, _: &SignupPayload) -> Result<ApiResponse> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(ApiResponse::new(400, r#"{"message": "late"}"#))
        }
    }

    #[tokio::test]
    async fn closing_the_form_discards_the_response() {
        let session = filled();
        let lifetime = session.lifetime();
        let api = Arc::new(SlowApi);

        let handle = {
            let session = session.clone();
            let api = Arc::clone(&api);
            tokio::spawn(async move { session.submit(api.as_ref()).await })
        };

        while !session.is_busy() {
            tokio::task::yield_now().await;
        }

        lifetime.end();
        assert_eq!(handle.await.unwrap(), SubmitOutcome::Abandoned);
        assert!(session.errors().is_empty());
        assert!(!session.is_busy());
    }
}
