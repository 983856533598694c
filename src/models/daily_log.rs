use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

pub const DEFAULT_WATER_TARGET_ML: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Poor,
    Terrible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

/// Water intake in millilitres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hydration {
    pub water_intake: f64,
    pub target: f64,
}

impl Default for Hydration {
    fn default() -> Self {
        Self {
            water_intake: 0.0,
            target: DEFAULT_WATER_TARGET_ML,
        }
    }
}

/// Duration in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sleep {
    pub duration: f64,
    pub quality: Option<SleepQuality>,
    pub sleep_time: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Duration in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: f64,
    pub intensity: Option<Intensity>,
    pub calories_burned: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default)]
    pub foods: Vec<Food>,
}

impl Meal {
    pub fn calories(&self) -> f64 {
        self.foods.iter().map(|f| f.calories).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub meals: Vec<Meal>,
    pub total_calories: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_meals_followed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub junk_food_consumed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressure {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: Option<String>,
    #[serde(default)]
    pub taken: bool,
    pub time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    pub weight: Option<f64>,
    pub blood_pressure: Option<BloodPressure>,
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

/// One user's record for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub hydration: Option<Hydration>,
    pub sleep: Option<Sleep>,
    pub exercise: Vec<ExerciseEntry>,
    pub nutrition: Option<Nutrition>,
    pub vitals: Option<Vitals>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct DailyLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub hydration: Option<Json<Hydration>>,
    pub sleep: Option<Json<Sleep>>,
    pub exercise: Json<Vec<ExerciseEntry>>,
    pub nutrition: Option<Json<Nutrition>>,
    pub vitals: Option<Json<Vitals>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyLogRow> for DailyLog {
    fn from(row: DailyLogRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.log_date,
            mood: row.mood,
            notes: row.notes,
            hydration: row.hydration.map(|j| j.0),
            sleep: row.sleep.map(|j| j.0),
            exercise: row.exercise.0,
            nutrition: row.nutrition.map(|j| j.0),
            vitals: row.vitals.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
impl DailyLog {
    /// Empty log for `date`, as created by the first write of the day.
    pub fn empty(user_id: Uuid, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            mood: None,
            notes: None,
            hydration: None,
            sleep: None,
            exercise: Vec::new(),
            nutrition: None,
            vitals: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_entry_uses_type_key() {
        let entry: ExerciseEntry = serde_json::from_str(
            r#"{"type":"Running","duration":30,"intensity":"High","caloriesBurned":300}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, "Running");
        assert_eq!(entry.intensity, Some(Intensity::High));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "Running");
        assert_eq!(json["caloriesBurned"], 300.0);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_food_macros_default_to_zero() {
        let meal: Meal =
            serde_json::from_str(r#"{"type":"Lunch","foods":[{"name":"Apple","calories":95}]}"#)
                .unwrap();
        assert_eq!(meal.foods[0].protein, 0.0);
        assert_eq!(meal.calories(), 95.0);
    }

    #[test]
    fn test_hydration_default_matches_empty_state() {
        let json = serde_json::to_value(Hydration::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "waterIntake": 0.0, "target": 2000.0 }));
    }

    #[test]
    fn test_unknown_mood_rejected() {
        assert!(serde_json::from_str::<Mood>(r#""Ecstatic""#).is_err());
    }
}
