use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    jwt::create_token,
    password::{hash_password, verify_password},
};
use crate::db;
use crate::dto::{normalize_email, LoginRequest, LoginResponse, RegisterRequest, TokenResponse};
use crate::error::{AppError, AppResult};
use crate::validation::ValidatedJson;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let email = normalize_email(&body.email);
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    let user = db::users::create(&state.db, name, &email, &pwd_hash).await?;
    let token = create_token(user.id, &state.config)?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Unknown email and wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&body.email);
    let user = db::users::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_token(user.id, &state.config)?;
    Ok(Json(LoginResponse {
        token,
        name: user.name,
    }))
}
