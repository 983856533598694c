use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{EmailSettingsResponse, EmailSettingsUpdated};
use crate::error::{AppError, AppResult};
use crate::models::user::{EmailSettings, EmailSettingsUpdate};
use crate::validation::AppJson;
use crate::AppState;

async fn current_settings(state: &AppState, auth_user: &AuthUser) -> AppResult<EmailSettings> {
    let user = db::users::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(user.email_settings.0)
}

pub async fn get_email_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EmailSettingsResponse>> {
    let settings = current_settings(&state, &auth_user).await?;
    Ok(Json(EmailSettingsResponse { settings }))
}

/// Only the keys present in the body change.
pub async fn update_email_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(update): AppJson<EmailSettingsUpdate>,
) -> AppResult<Json<EmailSettingsUpdated>> {
    let merged = current_settings(&state, &auth_user).await?.merge(update);
    let settings = db::users::update_email_settings(&state.db, auth_user.id, &merged).await?;

    tracing::info!(user_id = %auth_user.id, "Email settings updated");
    Ok(Json(EmailSettingsUpdated {
        message: "Email settings updated successfully",
        settings,
    }))
}
