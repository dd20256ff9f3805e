use std::sync::LazyLock;

use regex::Regex;

use crate::models::{SignInForm, SignUpForm};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_FULL_NAME_LEN: usize = 2;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Form problems detected before any network call
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Full name must be at least 2 characters")]
    FullNameTooShort,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// The email is checked as typed; surrounding whitespace makes it invalid
pub fn validate_sign_in(form: &SignInForm) -> Result<(), ValidationError> {
    if form.email.is_empty() || form.password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !password_long_enough(&form.password) {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Checks run in the order the UI reports them: the first failure wins
pub fn validate_sign_up(form: &SignUpForm) -> Result<(), ValidationError> {
    let full_name = form.full_name.trim();

    if form.email.is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
        || full_name.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if !password_long_enough(&form.password) {
        return Err(ValidationError::PasswordTooShort);
    }
    if full_name.chars().count() < MIN_FULL_NAME_LEN {
        return Err(ValidationError::FullNameTooShort);
    }

    Ok(())
}
