//! Username format rules
//!
//! Rules are checked in a fixed order and the first failure wins:
//! 1. non-empty after trim
//! 2. 3..=20 characters
//! 3. no whitespace
//! 4. only ASCII letters, digits, `_` and `-`
//! 5. starts with a letter or digit
//! 6. no doubled special characters (`__`, `--`, `_-`, `-_`)
//! 7. not a reserved word (case-insensitive)

use std::fmt;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Reserved usernames, lower case
pub const RESERVED_USERNAMES: &[&str] = &[
    "admin", "administrator", "root", "api", "www", "mail", "email", "support",
    "help", "info", "contact", "about", "blog", "news", "terms", "privacy",
    "login", "signup", "signin", "register", "auth", "profile", "user", "users",
    "account", "settings", "dashboard", "home", "index", "null", "undefined",
    "true", "false", "test", "demo", "sample", "example", "temp", "temporary",
    "anonymous", "guest", "public", "private", "system", "official", "verified",
];

const DOUBLED_SPECIALS: &[&str] = &["__", "--", "_-", "-_"];

/// Why a username was rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatViolation {
    Empty,
    TooShort,
    TooLong,
    ContainsWhitespace,
    InvalidCharacters,
    InvalidFirstCharacter,
    ConsecutiveSpecialCharacters,
    Reserved,
}

impl fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username is required"),
            Self::TooShort => write!(
                f,
                "Username must be at least {} characters long",
                MIN_USERNAME_LENGTH
            ),
            Self::TooLong => write!(
                f,
                "Username must be no more than {} characters long",
                MAX_USERNAME_LENGTH
            ),
            Self::ContainsWhitespace => write!(f, "Username cannot contain spaces"),
            Self::InvalidCharacters => write!(
                f,
                "Username can only contain letters, numbers, underscores, and hyphens"
            ),
            Self::InvalidFirstCharacter => {
                write!(f, "Username must start with a letter or number")
            }
            Self::ConsecutiveSpecialCharacters => {
                write!(f, "Username cannot have consecutive special characters")
            }
            Self::Reserved => write!(f, "This username is reserved and cannot be used"),
        }
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Whether `username` (any case) is reserved
pub fn is_reserved(username: &str) -> bool {
    let lower = username.to_lowercase();
    RESERVED_USERNAMES.contains(&lower.as_str())
}

/// Full submit-time validation
pub fn validate_format(username: &str) -> Result<(), FormatViolation> {
    if username.trim().is_empty() {
        return Err(FormatViolation::Empty);
    }

    let length = username.chars().count();
    if length < MIN_USERNAME_LENGTH {
        return Err(FormatViolation::TooShort);
    }
    if length > MAX_USERNAME_LENGTH {
        return Err(FormatViolation::TooLong);
    }

    if username.chars().any(char::is_whitespace) {
        return Err(FormatViolation::ContainsWhitespace);
    }

    if !username.chars().all(is_allowed_char) {
        return Err(FormatViolation::InvalidCharacters);
    }

    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(FormatViolation::InvalidFirstCharacter);
    }

    if DOUBLED_SPECIALS.iter().any(|pair| username.contains(pair)) {
        return Err(FormatViolation::ConsecutiveSpecialCharacters);
    }

    if is_reserved(username) {
        return Err(FormatViolation::Reserved);
    }

    Ok(())
}

/// Keystroke-time validation: an empty field is not an error yet
pub fn validate_real_time(username: &str) -> Result<(), FormatViolation> {
    if username.is_empty() {
        return Ok(());
    }
    validate_format(username)
}
