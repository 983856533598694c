use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_settings: Json<EmailSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification preferences. Missing keys in the stored document take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub weekly_report: bool,
    pub tracking_reminders: bool,
    pub milestone_alerts: bool,
    pub reminder_time: Option<NaiveTime>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            weekly_report: true,
            tracking_reminders: true,
            milestone_alerts: true,
            reminder_time: None,
        }
    }
}

/// Partial update; only supplied keys overwrite.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettingsUpdate {
    pub weekly_report: Option<bool>,
    pub tracking_reminders: Option<bool>,
    pub milestone_alerts: Option<bool>,
    pub reminder_time: Option<NaiveTime>,
}

impl EmailSettings {
    pub fn merge(mut self, update: EmailSettingsUpdate) -> Self {
        if let Some(v) = update.weekly_report {
            self.weekly_report = v;
        }
        if let Some(v) = update.tracking_reminders {
            self.tracking_reminders = v;
        }
        if let Some(v) = update.milestone_alerts {
            self.milestone_alerts = v;
        }
        if update.reminder_time.is_some() {
            self.reminder_time = update.reminder_time;
        }
        self
    }
}
