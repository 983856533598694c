use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

pub const DEFAULT_MAX_RATING: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Number,
    Boolean,
    Text,
    MultipleChoice,
    Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Fitness,
    Nutrition,
    Lifestyle,
    Finance,
    Productivity,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomLogDefinition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub options: Json<MetricOptions>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub track_streak: bool,
    pub reminder_enabled: bool,
    pub reminder_time: Option<NaiveTime>,
    pub category: Category,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A custom entry's value, keyed by the definition's field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum EntryValue {
    Number(f64),
    Boolean(bool),
    Text(String),
    Choice(String),
    Rating(u32),
}

impl EntryValue {
    /// Parse a raw JSON value against a definition's field type and options.
    pub fn parse(field_type: FieldType, options: &MetricOptions, raw: &Value) -> Result<Self, String> {
        match field_type {
            FieldType::Number => {
                let n = raw.as_f64().ok_or("value must be a number")?;
                if let Some(min) = options.min {
                    if n < min {
                        return Err(format!("value must be at least {}", min));
                    }
                }
                if let Some(max) = options.max {
                    if n > max {
                        return Err(format!("value must be at most {}", max));
                    }
                }
                Ok(EntryValue::Number(n))
            }
            FieldType::Boolean => raw
                .as_bool()
                .map(EntryValue::Boolean)
                .ok_or_else(|| "value must be true or false".to_string()),
            FieldType::Text => raw
                .as_str()
                .map(|s| EntryValue::Text(s.to_string()))
                .ok_or_else(|| "value must be a string".to_string()),
            FieldType::MultipleChoice => {
                let choice = raw.as_str().ok_or("value must be one of the choices")?;
                match &options.choices {
                    Some(choices) if !choices.is_empty() && !choices.iter().any(|c| c == choice) => {
                        Err(format!("value must be one of: {}", choices.join(", ")))
                    }
                    _ => Ok(EntryValue::Choice(choice.to_string())),
                }
            }
            FieldType::Rating => {
                let max = options.max_rating.unwrap_or(DEFAULT_MAX_RATING);
                // 4 and 4.0 are the same rating
                match raw.as_f64() {
                    Some(r) if r.fract() == 0.0 && r >= 1.0 && r <= f64::from(max) => {
                        Ok(EntryValue::Rating(r as u32))
                    }
                    _ => Err(format!("value must be a whole number from 1 to {}", max)),
                }
            }
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            EntryValue::Number(n) => Some(*n),
            EntryValue::Rating(r) => Some(f64::from(*r)),
            _ => None,
        }
    }

    /// Plain JSON scalar as shown to API clients.
    pub fn to_json(&self) -> Value {
        match self {
            EntryValue::Number(n) => Value::from(*n),
            EntryValue::Boolean(b) => Value::from(*b),
            EntryValue::Text(s) | EntryValue::Choice(s) => Value::from(s.as_str()),
            EntryValue::Rating(r) => Value::from(*r),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub definition_id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub value: Json<EntryValue>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
