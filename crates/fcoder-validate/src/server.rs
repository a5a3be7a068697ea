//! Backend failure translation.
//!
//! The backend's error bodies have no fixed shape beyond "maybe a
//! message, maybe a list of field errors". This module reads them
//! leniently and maps them onto [`ValidationError`]s so local and remote
//! failures render through the same path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::fields;
use crate::messages;

/// Phrases the backend uses when credentials are rejected.
const CREDENTIAL_FAILURES: [&str; 4] = [
    "Bad credentials",
    "Invalid credentials",
    "Authentication failed",
    "Unauthorized",
];

/// One entry of the backend's `validationErrors` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerFieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: Some(message.into()),
        }
    }
}

/// A backend failure payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ServerFieldError>>,
}

impl ServerErrorResponse {
    /// Payload carrying only a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            validation_errors: None,
        }
    }

    /// Decode a response body. Anything that is not a JSON object, or
    /// fields of the wrong type, degrade to absent values.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::debug!(error = %err, "server error body is not JSON");
                Self::default()
            }
        }
    }

    /// Extract the known keys from an arbitrary JSON value.
    pub fn from_value(value: &Value) -> Self {
        let message = text(value.get("message"));

        let validation_errors = value
            .get("validationErrors")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| ServerFieldError {
                        field: text(entry.get("field")),
                        message: text(entry.get("message")),
                    })
                    .collect()
            });

        Self {
            message,
            validation_errors,
        }
    }
}

/// A non-empty string, or nothing.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Classify the top-level backend message. Order matters: earlier
/// checks win when a message contains several known phrases.
fn translate_message(message: &str) -> ValidationError {
    if message.contains("Role ID") {
        return ValidationError::new(fields::ROLE_ID, messages::ROLE_ID_REQUIRED);
    }

    if CREDENTIAL_FAILURES.iter().any(|p| message.contains(p)) {
        return ValidationError::general(messages::LOGIN_FAILED);
    }

    if message.contains("username") {
        return ValidationError::new(fields::USERNAME, message);
    }

    if message.contains("email") {
        return ValidationError::new(fields::EMAIL, message);
    }

    let lowered = message.to_lowercase();
    let translated = if lowered.contains("failed to login") {
        messages::LOGIN_FAILED_CHECK_INFO
    } else if lowered.contains("login failed") {
        messages::LOGIN_FAILED_RETRY
    } else {
        tracing::debug!(server_message = message, "unrecognised server message, passing through");
        message
    };

    ValidationError::general(translated)
}

/// Convert a backend failure into field errors.
///
/// The top-level message (if any) yields one error; each entry of
/// `validationErrors` yields one more. Missing entry fields fall back
/// to the general bucket and a generic message. Never fails.
pub fn handle_server_validation_errors(response: &ServerErrorResponse) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(message) = response.message.as_deref().filter(|m| !m.is_empty()) {
        errors.push(translate_message(message));
    }

    if let Some(entries) = &response.validation_errors {
        errors.extend(entries.iter().map(|entry| {
            ValidationError::new(
                entry
                    .field
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .unwrap_or(fields::GENERAL),
                entry
                    .message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(messages::VALIDATION_FAILED),
            )
        }));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translate(message: &str) -> Vec<ValidationError> {
        handle_server_validation_errors(&ServerErrorResponse::with_message(message))
    }

    #[test]
    fn role_id_message() {
        assert_eq!(
            translate("Role ID shouldn't be empty"),
            vec![ValidationError::new("roleId", messages::ROLE_ID_REQUIRED)]
        );
    }

    #[test]
    fn credential_failures() {
        for phrase in CREDENTIAL_FAILURES {
            assert_eq!(
                translate(&format!("Error: {phrase}")),
                vec![ValidationError::general(messages::LOGIN_FAILED)]
            );
        }
    }

    #[test]
    fn field_scoped_messages_pass_through() {
        assert_eq!(
            translate("username already exists"),
            vec![ValidationError::new("username", "username already exists")]
        );
        assert_eq!(
            translate("email is taken"),
            vec![ValidationError::new("email", "email is taken")]
        );
    }

    #[test]
    fn priority_order() {
        // Role ID beats credentials, credentials beat username.
        assert_eq!(translate("Role ID Unauthorized")[0].field, "roleId");
        assert_eq!(translate("Unauthorized username")[0].field, "general");
        assert_eq!(translate("username or email")[0].field, "username");
    }

    #[test]
    fn substring_checks_are_case_sensitive() {
        assert_eq!(translate("Username already exists")[0].field, "general");
        assert_eq!(translate("Email isn't in valid format")[0].field, "general");
    }

    #[test]
    fn login_failure_phrases_are_localized() {
        assert_eq!(
            translate("Failed to login: account locked")[0].message,
            messages::LOGIN_FAILED_CHECK_INFO
        );
        assert_eq!(
            translate("LOGIN FAILED")[0].message,
            messages::LOGIN_FAILED_RETRY
        );
        assert_eq!(translate("Something broke")[0].message, "Something broke");
    }

    #[test]
    fn validation_entries_with_defaults() {
        let response = ServerErrorResponse {
            message: None,
            validation_errors: Some(vec![
                ServerFieldError::new("email", "taken"),
                ServerFieldError::default(),
            ]),
        };

        assert_eq!(
            handle_server_validation_errors(&response),
            vec![
                ValidationError::new("email", "taken"),
                ValidationError::new("general", messages::VALIDATION_FAILED),
            ]
        );
    }

    #[test]
    fn message_and_entries_are_concatenated() {
        let response = ServerErrorResponse {
            message: Some("Validation failed".into()),
            validation_errors: Some(vec![ServerFieldError::new("phone", "Invalid")]),
        };

        let errors = handle_server_validation_errors(&response);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], ValidationError::general("Validation failed"));
        assert_eq!(errors[1], ValidationError::new("phone", "Invalid"));
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert!(handle_server_validation_errors(&ServerErrorResponse::default()).is_empty());
        assert!(translate("").is_empty());
    }

    #[test]
    fn lenient_decoding() {
        let parsed = ServerErrorResponse::from_value(&json!({
            "message": 42,
            "validationErrors": [{"field": "email", "message": "taken"}, "junk", {"field": ""}]
        }));
        assert_eq!(parsed.message, None);
        assert_eq!(
            parsed.validation_errors,
            Some(vec![
                ServerFieldError::new("email", "taken"),
                ServerFieldError::default(),
                ServerFieldError::default(),
            ])
        );

        let parsed = ServerErrorResponse::from_value(&json!({"validationErrors": "oops"}));
        assert_eq!(parsed.validation_errors, None);

        assert_eq!(
            ServerErrorResponse::from_slice(b"<html>502</html>"),
            ServerErrorResponse::default()
        );
        assert_eq!(
            ServerErrorResponse::from_slice(br#"["not", "an", "object"]"#),
            ServerErrorResponse::default()
        );
    }

    #[test]
    fn serde_round_trip_shape() {
        let body = json!({
            "message": "Bad credentials",
            "validationErrors": [{"field": "password"}]
        });
        let parsed: ServerErrorResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), body);
    }
}
