//! Field validators.
//!
//! One pure function per form field. Each returns at most one error:
//! the first failing condition wins.

use chrono::{Datelike, Local, NaiveDate};

use crate::choices::{Gender, Major};
use crate::error::ValidationResult;
use crate::fields;
use crate::messages::{self, labels};
use crate::patterns::Pattern;
use crate::value::{DateInput, DateValue, FieldValue};

/// Youngest age accepted at signup.
pub const MIN_AGE: i32 = 16;

/// Inclusive bounds for the current term.
pub const MIN_TERM: i32 = 1;
pub const MAX_TERM: i32 = 10;

fn required(field: &str, label: &str) -> ValidationResult {
    ValidationResult::invalid(field, messages::required(label))
}

/// Required text field checked against a pattern after trimming.
fn required_pattern(
    value: impl FieldValue,
    field: &str,
    label: &str,
    pattern: Pattern,
    message: &str,
) -> ValidationResult {
    match value.present() {
        None => required(field, label),
        Some(v) if !pattern.is_match(v.trim()) => ValidationResult::invalid(field, message),
        Some(_) => ValidationResult::valid(),
    }
}

/// Optional text field: blank passes unless `is_required`.
fn optional_pattern(
    value: Option<&str>,
    is_required: bool,
    field: &str,
    label: &str,
    matches: impl FnOnce(&str) -> bool,
    message: &str,
) -> ValidationResult {
    match value.present() {
        None if is_required => required(field, label),
        None => ValidationResult::valid(),
        Some(v) if !matches(v.trim()) => ValidationResult::invalid(field, message),
        Some(_) => ValidationResult::valid(),
    }
}

pub fn username(value: impl FieldValue) -> ValidationResult {
    required_pattern(
        value,
        fields::USERNAME,
        labels::USERNAME,
        Pattern::Username,
        messages::USERNAME_INVALID,
    )
}

pub fn email(value: impl FieldValue) -> ValidationResult {
    required_pattern(
        value,
        fields::EMAIL,
        labels::EMAIL,
        Pattern::Email,
        messages::EMAIL_INVALID,
    )
}

/// Presence plus strength. The value is matched untrimmed, so
/// surrounding spaces make a password invalid.
pub fn password(value: impl FieldValue) -> ValidationResult {
    match value.present() {
        None => required(fields::PASSWORD, labels::PASSWORD),
        Some(v) if !Pattern::Password.is_match(v) => {
            ValidationResult::invalid(fields::PASSWORD, messages::PASSWORD_WEAK)
        }
        Some(_) => ValidationResult::valid(),
    }
}

/// Confirmation must be present and byte-for-byte equal to the password.
pub fn confirm_password(password: impl FieldValue, confirm: impl FieldValue) -> ValidationResult {
    match confirm.present() {
        None => required(fields::RE_PASSWORD, labels::RE_PASSWORD),
        Some(c) if password.raw().unwrap_or_default() != c => {
            ValidationResult::invalid(fields::RE_PASSWORD, messages::PASSWORD_MISMATCH)
        }
        Some(_) => ValidationResult::valid(),
    }
}

pub fn full_name(value: impl FieldValue) -> ValidationResult {
    match value.present() {
        None => required(fields::FULL_NAME, labels::FULL_NAME),
        Some(v) if v.trim().chars().count() < 2 => {
            ValidationResult::invalid(fields::FULL_NAME, messages::FULL_NAME_INVALID)
        }
        Some(_) => ValidationResult::valid(),
    }
}

/// Vietnamese mobile number.
pub fn phone(value: impl FieldValue, required: bool) -> ValidationResult {
    optional_pattern(
        value.raw(),
        required,
        fields::PHONE,
        labels::PHONE,
        |v| Pattern::Phone.is_match(v),
        messages::PHONE_INVALID,
    )
}

/// Student code, matched case-insensitively (`se123456` is accepted).
pub fn student_code(value: impl FieldValue, required: bool) -> ValidationResult {
    optional_pattern(
        value.raw(),
        required,
        fields::STUDENT_CODE,
        labels::STUDENT_CODE,
        |v| Pattern::StudentCode.is_match(&v.to_uppercase()),
        messages::STUDENT_CODE_INVALID,
    )
}

pub fn github(value: impl FieldValue, required: bool) -> ValidationResult {
    optional_pattern(
        value.raw(),
        required,
        fields::GITHUB,
        labels::GITHUB,
        |v| Pattern::GithubUsername.is_match(v),
        messages::GITHUB_INVALID,
    )
}

pub fn current_term(value: Option<i32>) -> ValidationResult {
    match value {
        None => required(fields::CURRENT_TERM, labels::CURRENT_TERM),
        Some(term) if !(MIN_TERM..=MAX_TERM).contains(&term) => {
            ValidationResult::invalid(fields::CURRENT_TERM, messages::CURRENT_TERM_INVALID)
        }
        Some(_) => ValidationResult::valid(),
    }
}

/// Age check against today's local date.
pub fn birthday(value: impl DateValue, required: bool) -> ValidationResult {
    birthday_on(value, required, Local::now().date_naive())
}

/// Age check against an explicit "today".
pub fn birthday_on(value: impl DateValue, required: bool, today: NaiveDate) -> ValidationResult {
    match value.to_date_input() {
        DateInput::Absent if required => self::required(fields::BIRTHDAY, labels::BIRTHDAY),
        DateInput::Absent => ValidationResult::valid(),
        DateInput::Invalid => {
            ValidationResult::invalid(fields::BIRTHDAY, messages::BIRTHDAY_INVALID)
        }
        DateInput::Date(born) if age_on(born, today) < MIN_AGE => {
            ValidationResult::invalid(fields::BIRTHDAY, messages::AGE_INVALID)
        }
        DateInput::Date(_) => ValidationResult::valid(),
    }
}

/// Whole years between `born` and `today`, counting a year only once
/// the birthday has been reached. Negative for future dates.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years - 1
    } else {
        years
    }
}

pub fn gender(value: impl FieldValue) -> ValidationResult {
    match value.present() {
        None => required(fields::GENDER, labels::GENDER),
        Some(v) if v.parse::<Gender>().is_err() => {
            ValidationResult::invalid(fields::GENDER, messages::GENDER_INVALID)
        }
        Some(_) => ValidationResult::valid(),
    }
}

pub fn major(value: impl FieldValue) -> ValidationResult {
    match value.present() {
        None => required(fields::MAJOR, labels::MAJOR),
        Some(v) if v.parse::<Major>().is_err() => {
            ValidationResult::invalid(fields::MAJOR, messages::MAJOR_INVALID)
        }
        Some(_) => ValidationResult::valid(),
    }
}
