use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::{logs_in_window, todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::dto::{SleepRequest, StatsWindowQuery};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::validation::{AppQuery, ValidatedJson};
use crate::AppState;

pub async fn track_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<SleepRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    track(&state, &auth_user, DimensionWrite::Sleep(body.into())).await
}

pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let sleep = todays_log(&state, &auth_user).await?.and_then(|log| log.sleep);
    Ok(Json(json!({ "sleep": sleep })))
}

pub async fn sleep_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsWindowQuery>,
) -> AppResult<Json<stats::SleepStats>> {
    let logs = logs_in_window(&state, &auth_user, &query).await?;
    Ok(Json(stats::sleep_stats(&logs)))
}
