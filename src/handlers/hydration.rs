use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::{logs_in_window, todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::dto::{HydrationRequest, StatsWindowQuery};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::validation::{AppQuery, ValidatedJson};
use crate::AppState;

pub async fn track_hydration(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<HydrationRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    track(&state, &auth_user, DimensionWrite::Hydration(body.into())).await
}

/// Untracked days report zero intake against the default target.
pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let hydration = todays_log(&state, &auth_user)
        .await?
        .and_then(|log| log.hydration)
        .unwrap_or_default();
    Ok(Json(json!({ "hydration": hydration })))
}

pub async fn hydration_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsWindowQuery>,
) -> AppResult<Json<stats::HydrationStats>> {
    let logs = logs_in_window(&state, &auth_user, &query).await?;
    Ok(Json(stats::hydration_stats(&logs)))
}
