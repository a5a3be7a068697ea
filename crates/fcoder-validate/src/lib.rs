//! # FCoder Validation
//!
//! Client-side validation for the FCoder club site's login and signup
//! forms, plus translation of backend failure payloads into the same
//! error shape.
//!
//! ## Example
//!
//! ```rust
//! use fcoder_validate::prelude::*;
//!
//! let form = LoginFormData::new("fcoder_member", "");
//! let result = validate_login_form(&form);
//!
//! assert!(!result.is_valid());
//! assert!(result.has_field_error(fields::PASSWORD));
//! assert_eq!(result.field_error(fields::PASSWORD), Some("Mật khẩu là bắt buộc"));
//! ```
//!
//! ## Components
//!
//! - [`patterns`] - named format rules (email, username, password, phone,
//!   student code, GitHub handle)
//! - [`validators`] - one pure function per field
//! - [`forms`] - login and signup form validators
//! - [`lookup`] - per-field error queries for highlighting inputs
//! - [`server`] - backend error translation
//!
//! ## Error Format
//!
//! ```json
//! {
//!   "isValid": false,
//!   "errors": [
//!     {"field": "email", "message": "Vui lòng nhập địa chỉ email hợp lệ"},
//!     {"field": "general", "message": "Đã xảy ra lỗi không mong muốn. Vui lòng thử lại."}
//!   ]
//! }
//! ```

pub mod choices;
mod error;
pub mod fields;
pub mod forms;
pub mod lookup;
pub mod messages;
pub mod patterns;
pub mod server;
pub mod validators;
pub mod value;


pub use choices::{Gender, Major, UnknownChoice};
pub use error::{ValidationError, ValidationResult};
pub use forms::{
    validate_login_form, validate_signup_form, validate_signup_form_on, LoginFormData,
    SignupFormData,
};
pub use lookup::{get_field_error, has_field_error};
pub use patterns::Pattern;
pub use server::{handle_server_validation_errors, ServerErrorResponse, ServerFieldError};
pub use value::{DateInput, DateValue, FieldValue};

/// Prelude module for validation
pub mod prelude {
    pub use crate::choices::{Gender, Major};
    pub use crate::error::{ValidationError, ValidationResult};
    pub use crate::fields;
    pub use crate::forms::{
        validate_login_form, validate_signup_form, validate_signup_form_on, LoginFormData,
        SignupFormData,
    };
    pub use crate::lookup::{get_field_error, has_field_error};
    pub use crate::messages;
    pub use crate::patterns::Pattern;
    pub use crate::server::{
        handle_server_validation_errors, ServerErrorResponse, ServerFieldError,
    };
    pub use crate::validators;
    pub use crate::value::{DateValue, FieldValue};
}
