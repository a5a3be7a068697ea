//! Pattern registry.
//!
//! One compiled definition per format so every validator and form
//! shares the same rule. The regex crate has no look-around, so the
//! password and GitHub rules pair an anchored regex with explicit checks.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static PASSWORD_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static STUDENT_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static GITHUB_REGEX: OnceLock<Regex> = OnceLock::new();

/// GitHub's own limit on handle length.
pub const GITHUB_MAX_LEN: usize = 39;

fn compile(slot: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    slot.get_or_init(|| Regex::new(pattern).expect("built-in pattern is a valid regex"))
}

fn email_regex() -> &'static Regex {
    compile(
        &EMAIL_REGEX,
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
    )
}

fn username_regex() -> &'static Regex {
    compile(&USERNAME_REGEX, r"^[a-zA-Z0-9_]{3,20}$")
}

fn password_regex() -> &'static Regex {
    // Allowed alphabet and minimum length; character classes are checked separately.
    compile(&PASSWORD_REGEX, r"^[a-zA-Z0-9@$!%*?&]{8,}$")
}

fn phone_regex() -> &'static Regex {
    // +84 / 84 / 0, then a mobile prefix digit and eight more digits.
    compile(&PHONE_REGEX, r"^(\+84|84|0)[35789][0-9]{8}$")
}

fn student_code_regex() -> &'static Regex {
    compile(&STUDENT_CODE_REGEX, r"^[A-Z]{2}[0-9]{6}$")
}

fn github_regex() -> &'static Regex {
    // No leading, trailing or doubled hyphens.
    compile(&GITHUB_REGEX, r"^[a-zA-Z0-9](?:-?[a-zA-Z0-9])*$")
}

/// A named format rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Email,
    Username,
    Password,
    Phone,
    StudentCode,
    GithubUsername,
}

impl Pattern {
    /// Every registered pattern.
    pub const ALL: [Pattern; 6] = [
        Pattern::Email,
        Pattern::Username,
        Pattern::Password,
        Pattern::Phone,
        Pattern::StudentCode,
        Pattern::GithubUsername,
    ];

    /// Registry name of the pattern.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Email => "EMAIL",
            Pattern::Username => "USERNAME",
            Pattern::Password => "PASSWORD",
            Pattern::Phone => "PHONE",
            Pattern::StudentCode => "STUDENT_CODE",
            Pattern::GithubUsername => "GITHUB_USERNAME",
        }
    }

    /// Test `value` against the rule. Total and side-effect free.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Pattern::Email => email_regex().is_match(value),
            Pattern::Username => username_regex().is_match(value),
            Pattern::Password => {
                password_regex().is_match(value)
                    && value.chars().any(|c| c.is_ascii_lowercase())
                    && value.chars().any(|c| c.is_ascii_uppercase())
                    && value.chars().any(|c| c.is_ascii_digit())
            }
            Pattern::Phone => phone_regex().is_match(value),
            Pattern::StudentCode => student_code_regex().is_match(value),
            Pattern::GithubUsername => {
                value.len() <= GITHUB_MAX_LEN && github_regex().is_match(value)
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
