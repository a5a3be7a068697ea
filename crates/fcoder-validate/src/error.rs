//! Validation error types and the JSON shape shared with the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fields;

/// A single validation failure attached to a form field.
///
/// `field` is either the name of the offending input or
/// [`fields::GENERAL`] for form-wide problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field name that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a form-wide error.
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(fields::GENERAL, message)
    }

    /// Check whether this error is scoped to the given field.
    pub fn is_for(&self, field: &str) -> bool {
        self.field == field
    }

    /// Check whether this error is form-wide.
    pub fn is_general(&self) -> bool {
        self.is_for(fields::GENERAL)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of running one or more validators.
///
/// Validity is derived from the error list, so a result is valid
/// exactly when it carries no errors. Errors keep the order in which
/// validators appended them.
///
/// Serializes as:
///
/// ```json
/// { "isValid": false, "errors": [{ "field": "email", "message": "..." }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A passing result.
    pub fn valid() -> Self {
        Self::default()
    }

    /// A result holding the given errors (valid if the list is empty).
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// A failing result with a single error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_errors(vec![ValidationError::new(field, message)])
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append all errors of another result, preserving order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Convert to Result - Ok if no errors, Err with the error list otherwise.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Message of the first error for `field`, if any.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        crate::lookup::get_field_error(&self.errors, field)
    }

    /// Whether any error targets `field`.
    pub fn has_field_error(&self, field: &str) -> bool {
        crate::lookup::has_field_error(&self.errors, field)
    }

    /// All errors for `field`, in order.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        crate::lookup::errors_for(&self.errors, field)
    }

    /// Form-wide errors, shown above the form rather than beside an input.
    pub fn general_errors(&self) -> impl Iterator<Item = &ValidationError> + '_ {
        self.errors_for(fields::GENERAL)
    }
}

impl From<Vec<ValidationError>> for ValidationResult {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::from_errors(errors)
    }
}

impl FromIterator<ValidationError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self::from_errors(iter.into_iter().collect())
    }
}

impl Extend<ValidationError> for ValidationResult {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Validation passed")
        } else {
            write!(f, "Validation failed: {} error(s)", self.errors.len())
        }
    }
}

/// Wire form of a result.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultBody {
    is_valid: bool,
    #[serde(default)]
    errors: Vec<ValidationError>,
}

impl Serialize for ValidationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let body = ResultBody {
            is_valid: self.is_valid(),
            errors: self.errors.clone(),
        };
        body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // `isValid` is recomputed from the errors.
        let body = ResultBody::deserialize(deserializer)?;
        Ok(Self::from_errors(body.errors))
    }
}
