use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::db::{self, custom_logs::EntryFilter};
use crate::dto::{
    CreateDefinitionRequest, CreateEntryRequest, CustomLogEntryResponse, EntryQuery, StatsQuery,
};
use crate::error::{AppError, AppResult};
use crate::models::custom_log::{CustomLogDefinition, EntryValue};
use crate::services::custom_stats::{self, Streak, WindowStats};
use crate::validation::{AppPath, AppQuery, ValidatedJson};
use crate::AppState;

pub async fn create_definition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateDefinitionRequest>,
) -> AppResult<(StatusCode, Json<CustomLogDefinition>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }

    let definition = db::custom_logs::create_definition(&state.db, auth_user.id, &body).await?;

    tracing::info!(
        user_id = %auth_user.id,
        definition_id = %definition.id,
        field_type = ?definition.field_type,
        "Custom log definition created"
    );
    Ok((StatusCode::CREATED, Json(definition)))
}

pub async fn list_definitions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<CustomLogDefinition>>> {
    let definitions = db::custom_logs::list_active_definitions(&state.db, auth_user.id).await?;
    Ok(Json(definitions))
}

/// Soft delete. Existing entries keep pointing at the definition.
pub async fn delete_definition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(definition_id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let deactivated =
        db::custom_logs::deactivate_definition(&state.db, auth_user.id, definition_id).await?;
    if !deactivated {
        return Err(AppError::NotFound("Definition not found".into()));
    }

    Ok(Json(json!({ "deleted": true, "id": definition_id })))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<CustomLogEntryResponse>)> {
    let definition = db::custom_logs::find_definition(&state.db, auth_user.id, body.definition_id)
        .await?
        .ok_or_else(|| AppError::Validation("Unknown definitionId".into()))?;

    let value = EntryValue::parse(definition.field_type, &definition.options, &body.value)
        .map_err(AppError::Validation)?;
    let date = body.date.unwrap_or_else(|| state.clock.now());
    let tags: Vec<String> = body
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let entry = db::custom_logs::create_entry(
        &state.db,
        auth_user.id,
        definition.id,
        date,
        &value,
        body.notes.as_deref(),
        &tags,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomLogEntryResponse::new(entry, Some(definition))),
    ))
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive calendar-day bounds as timestamps.
fn entry_filter(query: &EntryQuery) -> EntryFilter {
    EntryFilter {
        definition_id: query.definition_id,
        from: query.start_date.map(start_of_day),
        to: query
            .end_date
            .and_then(|d| d.succ_opt())
            .map(|next| start_of_day(next) - chrono::Duration::microseconds(1)),
    }
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<EntryQuery>,
) -> AppResult<Json<Vec<CustomLogEntryResponse>>> {
    let entries = db::custom_logs::list_entries(&state.db, auth_user.id, entry_filter(&query)).await?;

    let mut ids: Vec<Uuid> = entries.iter().map(|e| e.definition_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let definitions: HashMap<Uuid, CustomLogDefinition> =
        db::custom_logs::find_definitions_by_ids(&state.db, auth_user.id, &ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

    let body = entries
        .into_iter()
        .map(|entry| {
            let definition = definitions.get(&entry.definition_id).cloned();
            CustomLogEntryResponse::new(entry, definition)
        })
        .collect();

    Ok(Json(body))
}

#[derive(Debug, Serialize)]
pub struct CustomLogStats {
    pub streak: Streak,
    pub stats: WindowStats,
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> AppResult<Json<CustomLogStats>> {
    let definition_id = query
        .definition_id
        .ok_or_else(|| AppError::Validation("definitionId is required".into()))?;

    db::custom_logs::find_definition(&state.db, auth_user.id, definition_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Definition not found".into()))?;

    let now = state.clock.now();
    let window = EntryFilter {
        definition_id: Some(definition_id),
        from: Some(custom_stats::window_start(now)),
        to: Some(now),
    };

    let (dates, window_entries) = tokio::try_join!(
        db::custom_logs::entry_dates(&state.db, auth_user.id, definition_id),
        db::custom_logs::list_entries(&state.db, auth_user.id, window),
    )?;

    Ok(Json(CustomLogStats {
        streak: custom_stats::calculate_streak(&dates, now),
        stats: custom_stats::window_stats(window_entries.iter().map(|e| &e.value.0)),
    }))
}
