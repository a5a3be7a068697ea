//! Form validators.
//!
//! Run every field validator a form needs and collect all errors, so a
//! submit can report every problem at once.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::choices::{Gender, Major};
use crate::error::{ValidationError, ValidationResult};
use crate::fields;
use crate::messages::{self, labels};
use crate::validators;
use crate::value::FieldValue;

/// Raw login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginFormData {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Raw signup form input, one entry per input element.
///
/// Text values are kept exactly as typed; `current_term` is the only
/// pre-parsed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupFormData {
    pub username: Option<String>,
    pub password: Option<String>,
    pub re_password: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub student_code: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub major: Option<String>,
    /// `YYYY-MM-DD` as produced by a date input.
    pub birthday: Option<String>,
    pub profile_img: Option<String>,
    pub current_term: Option<i32>,
}

impl SignupFormData {
    /// State of a freshly mounted signup form: empty text fields with the
    /// first gender, first major and first term preselected.
    pub fn initial() -> Self {
        let empty = || Some(String::new());
        Self {
            username: empty(),
            password: empty(),
            re_password: empty(),
            email: empty(),
            github: empty(),
            student_code: empty(),
            full_name: empty(),
            gender: Some(Gender::Male.as_str().to_string()),
            phone: empty(),
            major: Some(Major::SoftwareEngineering.as_str().to_string()),
            birthday: None,
            profile_img: empty(),
            current_term: Some(1),
        }
    }
}

/// Login only checks that a password is present; strength is a signup concern.
pub fn validate_login_form(form: &LoginFormData) -> ValidationResult {
    let mut result = validators::username(&form.username);

    if form.password.is_blank() {
        result.push(ValidationError::new(
            fields::PASSWORD,
            messages::required(labels::PASSWORD),
        ));
    }

    result
}

/// Validate a signup form against today's local date.
pub fn validate_signup_form(form: &SignupFormData) -> ValidationResult {
    validate_signup_form_on(form, Local::now().date_naive())
}

/// Validate a signup form with an explicit "today" for the age check.
///
/// Required fields come first, in form order, then the optional ones.
pub fn validate_signup_form_on(form: &SignupFormData, today: NaiveDate) -> ValidationResult {
    let mut result = ValidationResult::valid();

    result.merge(validators::username(&form.username));
    result.merge(validators::email(&form.email));
    result.merge(validators::password(&form.password));
    result.merge(validators::confirm_password(&form.password, &form.re_password));
    result.merge(validators::full_name(&form.full_name));
    result.merge(validators::gender(&form.gender));
    result.merge(validators::major(&form.major));
    result.merge(validators::current_term(form.current_term));

    result.merge(validators::phone(&form.phone, false));
    result.merge(validators::student_code(&form.student_code, false));
    result.merge(validators::github(&form.github, false));
    result.merge(validators::birthday_on(&form.birthday, false, today));

    result
}
