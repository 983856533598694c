//! # Request/Response DTOs
//!
//! API contract types for every route. Keys are camelCase on the wire.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Validation is expressed via `validator` derive macros

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::custom_log::{Category, CustomLogDefinition, CustomLogEntry, FieldType, MetricOptions};
use crate::models::daily_log::{
    BloodPressure, ExerciseEntry, Hydration, Intensity, Meal, Medication, Mood, Sleep, SleepQuality,
    Vitals, DEFAULT_WATER_TARGET_ML,
};
use crate::models::user::EmailSettings;
use crate::services::notifications::Milestone;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// ============================================================================
// Auth
// ============================================================================

/// POST /register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// POST /login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
}

/// Emails are matched case-insensitively.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ============================================================================
// Daily tracking
// ============================================================================

/// POST /api/exercise
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Exercise type is required"))]
    pub kind: String,
    #[validate(range(min = 0.0, message = "Duration must not be negative"))]
    pub duration: f64,
    pub intensity: Option<Intensity>,
    #[validate(range(min = 0.0, message = "Calories burned must not be negative"))]
    pub calories_burned: Option<f64>,
    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
}

impl From<ExerciseRequest> for ExerciseEntry {
    fn from(req: ExerciseRequest) -> Self {
        Self {
            kind: req.kind.trim().to_string(),
            duration: req.duration,
            intensity: req.intensity,
            calories_burned: req.calories_burned.unwrap_or(0.0),
            notes: req.notes,
        }
    }
}

/// POST /api/sleep
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SleepRequest {
    #[validate(range(min = 0.0, max = 24.0, message = "Duration must be between 0 and 24 hours"))]
    pub duration: f64,
    pub quality: Option<SleepQuality>,
    pub sleep_time: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
}

impl From<SleepRequest> for Sleep {
    fn from(req: SleepRequest) -> Self {
        Self {
            duration: req.duration,
            quality: req.quality,
            sleep_time: req.sleep_time,
            wake_time: req.wake_time,
            notes: req.notes,
        }
    }
}

/// POST /api/hydration
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HydrationRequest {
    #[validate(range(min = 0.0, message = "Water intake must not be negative"))]
    pub water_intake: f64,
    #[validate(range(min = 0.0, message = "Target must not be negative"))]
    pub target: Option<f64>,
}

impl From<HydrationRequest> for Hydration {
    fn from(req: HydrationRequest) -> Self {
        Self {
            water_intake: req.water_intake,
            target: req.target.unwrap_or(DEFAULT_WATER_TARGET_ML),
        }
    }
}

/// POST /api/daily/mood
#[derive(Debug, Deserialize, Validate)]
pub struct MoodRequest {
    pub mood: Mood,
    #[validate(length(max = 2000, message = "Notes must be under 2000 characters"))]
    pub notes: Option<String>,
}

fn validate_meal(meal: &Meal) -> Result<(), ValidationError> {
    for food in &meal.foods {
        if food.name.trim().is_empty() {
            return Err(invalid("food_name", "Every food needs a name"));
        }
        if [food.calories, food.protein, food.carbs, food.fats]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(invalid("food_amounts", "Food calories and macros must not be negative"));
        }
    }
    Ok(())
}

/// POST /api/nutrition
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    #[validate(custom = "validate_meal")]
    pub meal: Meal,
    pub healthy_meals_followed: Option<bool>,
    pub junk_food_consumed: Option<bool>,
}

/// POST /api/vitals
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VitalsRequest {
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    pub blood_pressure: Option<BloodPressure>,
    #[validate(range(min = 0.0, message = "Heart rate must not be negative"))]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

impl From<VitalsRequest> for Vitals {
    fn from(req: VitalsRequest) -> Self {
        Self {
            weight: req.weight,
            blood_pressure: req.blood_pressure,
            heart_rate: req.heart_rate,
            medications: req.medications,
        }
    }
}

/// Optional `startDate`/`endDate` on the stats routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsWindowQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Email
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EmailSettingsResponse {
    pub settings: EmailSettings,
}

#[derive(Debug, Serialize)]
pub struct EmailSettingsUpdated {
    pub message: &'static str,
    pub settings: EmailSettings,
}

/// POST /api/email/milestone
#[derive(Debug, Deserialize, Validate)]
pub struct MilestoneRequest {
    #[validate(custom = "validate_milestone")]
    pub milestone: Milestone,
}

fn validate_milestone(milestone: &Milestone) -> Result<(), ValidationError> {
    if milestone.title.trim().is_empty() {
        return Err(invalid("milestone_title", "Milestone title is required"));
    }
    if milestone.title.len() > 200 || milestone.description.len() > 2000 {
        return Err(invalid("milestone_length", "Milestone text is too long"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSentResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

// ============================================================================
// Custom logs
// ============================================================================

fn validate_definition(req: &CreateDefinitionRequest) -> Result<(), ValidationError> {
    let options = &req.options;
    if let (Some(min), Some(max)) = (options.min, options.max) {
        if min > max {
            return Err(invalid("options_range", "Minimum must not exceed maximum"));
        }
    }
    if options.max_rating == Some(0) {
        return Err(invalid("options_rating", "Maximum rating must be at least 1"));
    }
    if req.field_type == FieldType::MultipleChoice
        && options.choices.as_ref().map_or(false, |c| c.iter().any(|s| s.trim().is_empty()))
    {
        return Err(invalid("options_choices", "Choices must not be blank"));
    }
    Ok(())
}

/// POST /api/custom-logs/definitions
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_definition", skip_on_field_errors = false))]
pub struct CreateDefinitionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be under 500 characters"))]
    pub description: Option<String>,
    pub field_type: FieldType,
    #[serde(default)]
    pub options: MetricOptions,
    #[validate(length(max = 50, message = "Icon must be under 50 characters"))]
    pub icon: Option<String>,
    #[validate(length(max = 20, message = "Color must be under 20 characters"))]
    pub color: Option<String>,
    pub track_streak: Option<bool>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<NaiveTime>,
    pub category: Option<Category>,
}

/// POST /api/custom-logs/entries
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub definition_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub value: Value,
    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// GET /api/custom-logs/entries
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuery {
    pub definition_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/custom-logs/stats
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub definition_id: Option<Uuid>,
}

/// An entry with its value as a plain scalar and its resolved definition.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLogEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub definition_id: Uuid,
    pub date: DateTime<Utc>,
    pub value: Value,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<CustomLogDefinition>,
}

impl CustomLogEntryResponse {
    pub fn new(entry: CustomLogEntry, definition: Option<CustomLogDefinition>) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            definition_id: entry.definition_id,
            date: entry.entry_date,
            value: entry.value.0.to_json(),
            notes: entry.notes,
            tags: entry.tags,
            created_at: entry.created_at,
            definition,
        }
    }
}
