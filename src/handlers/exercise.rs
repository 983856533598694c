use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::{logs_in_window, todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::dto::{ExerciseRequest, StatsWindowQuery};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::validation::{AppQuery, ValidatedJson};
use crate::AppState;

pub async fn track_exercise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<ExerciseRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    track(&state, &auth_user, DimensionWrite::Exercise(body.into())).await
}

pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let exercises = todays_log(&state, &auth_user)
        .await?
        .map(|log| log.exercise)
        .unwrap_or_default();
    Ok(Json(json!({ "exercises": exercises })))
}

pub async fn exercise_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsWindowQuery>,
) -> AppResult<Json<stats::ExerciseStats>> {
    let logs = logs_in_window(&state, &auth_user, &query).await?;
    Ok(Json(stats::exercise_stats(&logs)))
}
