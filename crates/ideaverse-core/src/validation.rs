//! Field rules shared by several schemas.
//!
//! The functions returning `Result<(), validator::ValidationError>` plug into
//! `#[validate(custom(function = ...))]`.

use std::borrow::Cow;
use std::fmt;

use validator::ValidationError as RuleViolation;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password strength rules, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl PasswordRule {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordRule::TooShort => "password_too_short",
            PasswordRule::MissingUppercase => "password_missing_uppercase",
            PasswordRule::MissingLowercase => "password_missing_lowercase",
            PasswordRule::MissingDigit => "password_missing_digit",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::TooShort => "Password must be at least 8 characters long",
            PasswordRule::MissingUppercase => "Password must contain at least one uppercase letter",
            PasswordRule::MissingLowercase => "Password must contain at least one lowercase letter",
            PasswordRule::MissingDigit => "Password must contain at least one number",
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check a password, stopping at the first broken rule.
///
/// Length counts characters, not bytes.
pub fn check_password_strength(password: &str) -> Result<(), PasswordRule> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRule::TooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PasswordRule::MissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(PasswordRule::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::MissingDigit);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), RuleViolation> {
    check_password_strength(password)
        .map_err(|rule| RuleViolation::new(rule.code()).with_message(Cow::Borrowed(rule.message())))
}

pub fn validate_not_blank(value: &str) -> Result<(), RuleViolation> {
    if value.trim().is_empty() {
        return Err(RuleViolation::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Clamp a score into `[0.0, 1.0]`. NaN maps to `0.0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
