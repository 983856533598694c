use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::{logs_in_window, todays_log, track};
use crate::auth::middleware::AuthUser;
use crate::dto::{NutritionRequest, StatsWindowQuery};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::validation::{AppQuery, ValidatedJson};
use crate::AppState;

pub async fn track_meal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NutritionRequest>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    let write = DimensionWrite::Meal {
        meal: body.meal,
        healthy_meals_followed: body.healthy_meals_followed,
        junk_food_consumed: body.junk_food_consumed,
    };
    track(&state, &auth_user, write).await
}

pub async fn today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let nutrition = todays_log(&state, &auth_user)
        .await?
        .and_then(|log| log.nutrition)
        .unwrap_or_default();
    Ok(Json(json!({ "nutrition": nutrition })))
}

pub async fn nutrition_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsWindowQuery>,
) -> AppResult<Json<stats::NutritionStats>> {
    let logs = logs_in_window(&state, &auth_user, &query).await?;
    Ok(Json(stats::nutrition_stats(&logs)))
}
