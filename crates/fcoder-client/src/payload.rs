//! Registration request body for `POST /accounts/members/register/full`.

use chrono::NaiveDate;
use fcoder_validate::value::{DateInput, DateValue};
use fcoder_validate::{
    fields, messages, validate_signup_form_on, Gender, Major, SignupFormData, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Role assigned to self-registered accounts.
pub const MEMBER_ROLE_ID: i64 = 3;

/// Term used when the form leaves `currentTerm` empty.
pub const DEFAULT_TERM: i32 = 1;

/// Full member registration, as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub role_id: i64,
    pub username: String,
    pub password: String,
    pub re_password: String,
    pub email: String,
    pub github: String,
    pub student_code: String,
    pub full_name: String,
    pub gender: Gender,
    pub phone: String,
    pub major: Major,
    pub birthday: NaiveDate,
    pub profile_img: String,
    pub current_term: i32,
    pub fund_status: bool,
    pub is_active: bool,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn raw(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl SignupPayload {
    /// Validate `form` and build the request body from it.
    ///
    /// Fails with the form's errors when validation does not pass, so a
    /// payload always satisfies the signup rules. Text is trimmed, the
    /// student code is upper-cased and passwords are sent as typed.
    pub fn from_form(form: &SignupFormData, today: NaiveDate) -> Result<Self, ValidationResult> {
        let validation = validate_signup_form_on(form, today);
        if !validation.is_valid() {
            return Err(validation);
        }

        let gender = parse_choice::<Gender>(&form.gender, fields::GENDER)?;
        let major = parse_choice::<Major>(&form.major, fields::MAJOR)?;

        let birthday = match form.birthday.to_date_input() {
            DateInput::Date(date) => date,
            DateInput::Absent | DateInput::Invalid => today,
        };

        Ok(Self {
            role_id: MEMBER_ROLE_ID,
            username: trimmed(&form.username),
            password: raw(&form.password),
            re_password: raw(&form.re_password),
            email: trimmed(&form.email),
            github: trimmed(&form.github),
            student_code: trimmed(&form.student_code).to_uppercase(),
            full_name: trimmed(&form.full_name),
            gender,
            phone: trimmed(&form.phone),
            major,
            birthday,
            profile_img: trimmed(&form.profile_img),
            current_term: form.current_term.unwrap_or(DEFAULT_TERM),
            fund_status: false,
            is_active: true,
        })
    }
}

// Validation already accepted the value, so a parse failure here only
// happens if the validator and the enum disagree.
fn parse_choice<T: std::str::FromStr>(
    value: &Option<String>,
    field: &str,
) -> Result<T, ValidationResult> {
    value
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ValidationResult::invalid(field, messages::GENERAL_ERROR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form() -> SignupFormData {
        SignupFormData {
            username: Some(" le_an ".into()),
            password: Some("Fcoder2024".into()),
            re_password: Some("Fcoder2024".into()),
            email: Some("an.le@fpt.edu.vn".into()),
            student_code: Some("se170001".into()),
            full_name: Some("Lê An".into()),
            ..SignupFormData::initial()
        }
    }

    #[test]
    fn defaults_are_filled_in() {
        let payload = SignupPayload::from_form(&form(), today()).unwrap();

        assert_eq!(payload.role_id, 3);
        assert_eq!(payload.username, "le_an");
        assert_eq!(payload.student_code, "SE170001");
        assert_eq!(payload.phone, "");
        assert_eq!(payload.birthday, today());
        assert_eq!(payload.current_term, 1);
        assert!(!payload.fund_status);
        assert!(payload.is_active);
        assert_eq!(payload.gender, Gender::Male);
        assert_eq!(payload.major, Major::SoftwareEngineering);
    }

    #[test]
    fn wire_shape() {
        let form = SignupFormData {
            birthday: Some("2003-05-20".into()),
            gender: Some("FEMALE".into()),
            major: Some("AI".into()),
            current_term: Some(4),
            ..form()
        };
        let payload = SignupPayload::from_form(&form, today()).unwrap();
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(body["roleId"], json!(3));
        assert_eq!(body["rePassword"], json!("Fcoder2024"));
        assert_eq!(body["studentCode"], json!("SE170001"));
        assert_eq!(body["gender"], json!("FEMALE"));
        assert_eq!(body["major"], json!("AI"));
        assert_eq!(body["birthday"], json!("2003-05-20"));
        assert_eq!(body["currentTerm"], json!(4));
        assert_eq!(body["fundStatus"], json!(false));
        assert_eq!(body["isActive"], json!(true));
    }

    #[test]
    fn invalid_form_is_rejected() {
        let form = SignupFormData {
            email: Some("nope".into()),
            ..form()
        };
        let errors = SignupPayload::from_form(&form, today()).unwrap_err();
        assert!(errors.has_field_error(fields::EMAIL));
    }
}
