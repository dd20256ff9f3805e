/// Identity provider abstraction
///
/// Sign-in and sign-up against an external email/password identity service.
/// Failures come back as a fixed set of kinds so the UI can show a stable message.
use std::fmt::Display;

use axum::http::StatusCode;

use crate::models::{Credentials, UserIdentity};

pub mod identity_toolkit;

pub use identity_toolkit::IdentityToolkitProvider;

/// Which form the user submitted; messages differ slightly between the two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    SignUp,
}

impl Display for AuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFlow::SignIn => write!(f, "sign-in"),
            AuthFlow::SignUp => write!(f, "sign-up"),
        }
    }
}

/// Typed identity provider failure
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid email")]
    InvalidEmail,

    #[error("no account for this email")]
    UserNotFound,

    #[error("wrong credentials")]
    WrongCredentials,

    #[error("account already exists")]
    AccountExists,

    #[error("weak password")]
    WeakPassword,

    #[error("too many attempts")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("unknown provider error: {0}")]
    Unknown(String),
}

impl IdentityError {
    /// Maps a provider error code (e.g. `EMAIL_EXISTS`) to an error kind
    pub fn from_code(code: &str) -> Self {
        // Codes may carry a detail suffix: "WEAK_PASSWORD : Password should be ..."
        let head = code.split(':').next().unwrap_or_default().trim();
        match head {
            "INVALID_EMAIL" => IdentityError::InvalidEmail,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityError::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => IdentityError::WrongCredentials,
            "EMAIL_EXISTS" => IdentityError::AccountExists,
            "WEAK_PASSWORD" => IdentityError::WeakPassword,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::RateLimited,
            _ => IdentityError::Unknown(code.to_string()),
        }
    }

    /// Human-readable message for the given flow
    pub fn user_message(&self, flow: AuthFlow) -> &'static str {
        match (flow, self) {
            (_, IdentityError::InvalidEmail) => "Invalid email address",
            (_, IdentityError::Network(_)) => "Network error. Please check your connection",
            (AuthFlow::SignIn, IdentityError::UserNotFound) => {
                "No account found with this email address"
            }
            (AuthFlow::SignIn, IdentityError::WrongCredentials) => "Incorrect password",
            (AuthFlow::SignIn, IdentityError::RateLimited) => {
                "Too many failed attempts. Please try again later"
            }
            (AuthFlow::SignIn, _) => "Sign in failed. Please try again",
            (AuthFlow::SignUp, IdentityError::AccountExists) => {
                "An account with this email already exists"
            }
            (AuthFlow::SignUp, IdentityError::WeakPassword) => {
                "Password is too weak. Please choose a stronger password"
            }
            (AuthFlow::SignUp, IdentityError::RateLimited) => {
                "Too many attempts. Please try again later"
            }
            (AuthFlow::SignUp, _) => "Sign up failed. Please try again",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::InvalidEmail | IdentityError::WeakPassword => StatusCode::BAD_REQUEST,
            IdentityError::UserNotFound | IdentityError::WrongCredentials => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::AccountExists => StatusCode::CONFLICT,
            IdentityError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            IdentityError::Network(_) | IdentityError::Unknown(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Trait for identity providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticates an existing account
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserIdentity, IdentityError>;

    /// Creates a new account and returns its identity
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserIdentity, IdentityError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
