use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::{EmailSentResponse, MilestoneRequest};
use crate::error::{AppError, AppResult};
use crate::services::{
    daily_log::untracked_dimensions,
    notifications::{Dispatcher, Milestone},
    stats,
};
use crate::validation::ValidatedJson;
use crate::AppState;

fn dispatcher(state: &AppState) -> Dispatcher<'_> {
    Dispatcher::new(state.mailer.as_ref(), &state.config.frontend_url)
}

pub async fn send_weekly_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EmailSentResponse>> {
    let since = stats::window_start(state.clock.today());
    let report = db::daily_logs::weekly_report(&state.db, auth_user.id, since).await?;

    let message_id = dispatcher(&state)
        .weekly_report(&auth_user.email, &report)
        .await
        .map_err(|e| AppError::delivery("Failed to send weekly report", e))?;

    Ok(Json(EmailSentResponse {
        message: "Weekly report sent successfully",
        message_id: Some(message_id),
    }))
}

pub async fn send_tracking_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EmailSentResponse>> {
    let log = db::daily_logs::find_for_day(&state.db, auth_user.id, state.clock.today()).await?;
    let untracked = untracked_dimensions(log.as_ref());

    let message_id = dispatcher(&state)
        .tracking_reminder(&auth_user.email, &untracked)
        .await
        .map_err(|e| AppError::delivery("Failed to send reminder", e))?;

    Ok(Json(EmailSentResponse {
        message: "Reminder sent successfully",
        message_id,
    }))
}

pub async fn send_milestone(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<MilestoneRequest>,
) -> AppResult<Json<EmailSentResponse>> {
    let message_id = dispatcher(&state)
        .milestone(&auth_user.email, &body.milestone)
        .await
        .map_err(|e| AppError::delivery("Failed to send milestone notification", e))?;

    Ok(Json(EmailSentResponse {
        message: "Milestone notification sent successfully",
        message_id: Some(message_id),
    }))
}

pub async fn send_test_email(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EmailSentResponse>> {
    tracing::info!(user_id = %auth_user.id, "Sending test email");
    let message_id = dispatcher(&state)
        .milestone(&auth_user.email, &Milestone::test_notification())
        .await
        .map_err(|e| AppError::delivery("Failed to send test email", e))?;

    Ok(Json(EmailSentResponse {
        message: "Test email sent successfully",
        message_id: Some(message_id),
    }))
}
