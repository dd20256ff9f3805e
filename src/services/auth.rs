use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{SignInForm, SignUpForm, UserIdentity},
    services::{
        identity::{AuthFlow, IdentityProvider},
        profile_store::ProfileStore,
        validation,
    },
};

/// Validates auth forms locally, calls the identity provider and hands the
/// resulting identity to the profile store.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    profile: Arc<ProfileStore>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, profile: Arc<ProfileStore>) -> Self {
        Self { provider, profile }
    }

    pub async fn sign_in(&self, form: &SignInForm) -> AppResult<UserIdentity> {
        validation::validate_sign_in(form)?;

        let identity = self
            .provider
            .sign_in(&form.credentials())
            .await
            .map_err(|e| AppError::Identity(AuthFlow::SignIn, e))?;

        self.profile.login(identity.clone());
        Ok(identity)
    }

    /// Creates the account; the display name is the trimmed full name from the form
    pub async fn sign_up(&self, form: &SignUpForm) -> AppResult<UserIdentity> {
        validation::validate_sign_up(form)?;

        let mut identity = self
            .provider
            .sign_up(&form.credentials())
            .await
            .map_err(|e| AppError::Identity(AuthFlow::SignUp, e))?;
        identity.display_name = form.full_name.trim().to_string();

        self.profile.login(identity.clone());
        Ok(identity)
    }

    pub fn sign_out(&self) {
        self.profile.logout();
    }
}
