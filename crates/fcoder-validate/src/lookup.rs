//! Per-field queries over an error list, used to highlight inputs.

use crate::error::ValidationError;

/// Message of the first error for `field`, or `None` when the field is clean.
pub fn get_field_error<'a>(errors: &'a [ValidationError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.is_for(field))
        .map(|e| e.message.as_str())
}

/// Whether any error targets `field`.
pub fn has_field_error(errors: &[ValidationError], field: &str) -> bool {
    errors.iter().any(|e| e.is_for(field))
}

/// Every error for `field`, in order.
pub fn errors_for<'a>(
    errors: &'a [ValidationError],
    field: &'a str,
) -> impl Iterator<Item = &'a ValidationError> + 'a {
    errors.iter().filter(move |e| e.is_for(field))
}

/// Drop every error for `field`, keeping the order of the rest.
pub fn clear_field(errors: &mut Vec<ValidationError>, field: &str) {
    errors.retain(|e| !e.is_for(field));
}
