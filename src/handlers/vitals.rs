use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::{logs_in_window, todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::dto::{StatsWindowQuery, VitalsRequest};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::validation::{AppQuery, ValidatedJson};
use crate::AppState;

pub async fn track_vitals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<VitalsRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    track(&state, &auth_user, DimensionWrite::Vitals(body.into())).await
}

pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let vitals = todays_log(&state, &auth_user).await?.and_then(|log| log.vitals);
    Ok(Json(json!({ "vitals": vitals })))
}

pub async fn vitals_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsWindowQuery>,
) -> AppResult<Json<stats::VitalsStats>> {
    let logs = logs_in_window(&state, &auth_user, &query).await?;
    Ok(Json(stats::vitals_stats(&logs)))
}
