use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::{
    api::AppState,
    error::AppResult,
    middleware::RequestId,
    models::{SignInForm, SignUpForm, UserIdentity},
};

pub async fn sign_in(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<SignInForm>,
) -> AppResult<Json<UserIdentity>> {
    let user = state.auth.sign_in(&form).await.inspect_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Sign in rejected");
    })?;
    Ok(Json(user))
}

pub async fn sign_up(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<SignUpForm>,
) -> AppResult<(StatusCode, Json<UserIdentity>)> {
    let user = state.auth.sign_up(&form).await.inspect_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Sign up rejected");
    })?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Signs out and resets the profile
pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.auth.sign_out();
    StatusCode::NO_CONTENT
}
