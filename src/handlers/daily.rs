use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};

use super::{todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::MoodRequest;
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{
    daily_log::DimensionWrite,
    stats::{self, WeekSummary},
};
use crate::validation::ValidatedJson;
use crate::AppState;

pub async fn track_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<MoodRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    let write = DimensionWrite::Mood {
        mood: body.mood,
        notes: body.notes,
    };
    track(&state, &auth_user, write).await
}

/// Full log for today, or an empty object when nothing is tracked yet.
pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let body = match todays_log(&state, &auth_user).await? {
        Some(log) => serde_json::to_value(log).map_err(anyhow::Error::from)?,
        None => json!({}),
    };
    Ok(Json(body))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_log: Option<DailyLog>,
    pub week_summary: WeekSummary,
}

pub async fn dashboard_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DashboardSummary>> {
    let today = state.clock.today();
    let week_logs = db::daily_logs::list_between(
        &state.db,
        auth_user.id,
        stats::window_start(today),
        today,
    )
    .await?;

    let today_log = week_logs.iter().find(|log| log.date == today).cloned();

    Ok(Json(DashboardSummary {
        today_log,
        week_summary: stats::week_summary(&week_logs),
    }))
}
