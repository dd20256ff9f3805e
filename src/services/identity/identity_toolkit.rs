/// Identity Toolkit REST provider
///
/// Email/password accounts through the Identity Toolkit v1 API:
/// 1. Sign in: POST /v1/accounts:signInWithPassword?key=...
/// 2. Sign up: POST /v1/accounts:signUp?key=...
///
/// Errors come back as HTTP 400 with `{"error": {"message": "<CODE>"}}`.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    models::{Credentials, UserIdentity},
    services::identity::{IdentityError, IdentityProvider},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AccountResponse {
    /// Builds the identity, falling back to the email local part (or "User")
    /// when the account has no display name
    fn into_identity(self, requested_email: &str) -> UserIdentity {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| requested_email.to_string());
        let display_name = self
            .display_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "User".to_string());

        UserIdentity {
            id: self.local_id,
            email,
            display_name,
        }
    }
}

#[derive(Clone)]
pub struct IdentityToolkitProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl IdentityToolkitProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_credentials(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<UserIdentity, IdentityError> {
        let url = format!("{}/v1/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email: &credentials.email,
                password: &credentials.password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, endpoint = endpoint, "Identity request failed");
                IdentityError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !status.is_success() {
            let error = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => IdentityError::from_code(&envelope.error.message),
                Err(_) => IdentityError::Unknown(format!("status {}", status)),
            };
            tracing::info!(
                status = %status,
                error = %error,
                endpoint = endpoint,
                "Identity provider rejected request"
            );
            return Err(error);
        }

        let account: AccountResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse identity response");
            IdentityError::Unknown(format!("unexpected response: {}", e))
        })?;

        Ok(account.into_identity(&credentials.email))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserIdentity, IdentityError> {
        self.post_credentials("accounts:signInWithPassword", credentials)
            .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<UserIdentity, IdentityError> {
        self.post_credentials("accounts:signUp", credentials).await
    }

    fn name(&self) -> &'static str {
        "identity_toolkit"
    }
}
