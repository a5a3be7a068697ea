//! Field names shared by validators, the server-error translator and forms.

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const RE_PASSWORD: &str = "rePassword";
pub const EMAIL: &str = "email";
pub const GITHUB: &str = "github";
pub const STUDENT_CODE: &str = "studentCode";
pub const FULL_NAME: &str = "fullName";
pub const GENDER: &str = "gender";
pub const PHONE: &str = "phone";
pub const MAJOR: &str = "major";
pub const BIRTHDAY: &str = "birthday";
pub const PROFILE_IMG: &str = "profileImg";
pub const CURRENT_TERM: &str = "currentTerm";
pub const ROLE_ID: &str = "roleId";

/// Sentinel for errors that belong to the whole form.
pub const GENERAL: &str = "general";
