//! Raw input adapters.
//!
//! Form inputs arrive as text, possibly missing. These traits let every
//! validator accept `&str`, `String` and their `Option` forms while
//! treating missing, empty and whitespace-only input the same way.

use chrono::{DateTime, NaiveDate};

/// A raw text field value.
pub trait FieldValue {
    /// The raw text, or `None` if the field is missing.
    fn raw(&self) -> Option<&str>;

    /// The raw text if it contains anything other than whitespace.
    fn present(&self) -> Option<&str> {
        self.raw().filter(|v| !v.trim().is_empty())
    }

    /// Missing, empty and whitespace-only all count as blank.
    fn is_blank(&self) -> bool {
        self.present().is_none()
    }
}

impl FieldValue for str {
    fn raw(&self) -> Option<&str> {
        Some(self)
    }
}

impl FieldValue for String {
    fn raw(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn raw(&self) -> Option<&str> {
        (**self).raw()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn raw(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.raw())
    }
}

/// Outcome of reading a date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// Nothing was entered.
    Absent,
    /// Text was entered but it is not a date.
    Invalid,
    /// A calendar date.
    Date(NaiveDate),
}

/// A raw date field value: either a parsed date or date text.
pub trait DateValue {
    fn to_date_input(&self) -> DateInput;
}

impl DateValue for NaiveDate {
    fn to_date_input(&self) -> DateInput {
        DateInput::Date(*self)
    }
}

impl DateValue for str {
    fn to_date_input(&self) -> DateInput {
        parse_date(self)
    }
}

impl DateValue for String {
    fn to_date_input(&self) -> DateInput {
        parse_date(self)
    }
}

impl<T: DateValue + ?Sized> DateValue for &T {
    fn to_date_input(&self) -> DateInput {
        (**self).to_date_input()
    }
}

impl<T: DateValue> DateValue for Option<T> {
    fn to_date_input(&self) -> DateInput {
        match self {
            Some(v) => v.to_date_input(),
            None => DateInput::Absent,
        }
    }
}

/// Parse `YYYY-MM-DD` (what a date input produces) or an RFC 3339 timestamp.
pub fn parse_date(text: &str) -> DateInput {
    let text = text.trim();
    if text.is_empty() {
        return DateInput::Absent;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return DateInput::Date(date);
    }

    match DateTime::parse_from_rfc3339(text) {
        Ok(ts) => DateInput::Date(ts.date_naive()),
        Err(_) => DateInput::Invalid,
    }
}
