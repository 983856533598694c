//! Per-dimension merge rules for the day's log.
//!
//! Exercise entries and meals append; sleep, hydration, vitals and mood
//! replace whatever the day already held.

use crate::models::daily_log::{
    DailyLog, ExerciseEntry, Hydration, Meal, Mood, Nutrition, Sleep, Vitals,
};

#[derive(Debug, Clone)]
pub enum DimensionWrite {
    Exercise(ExerciseEntry),
    Sleep(Sleep),
    Hydration(Hydration),
    Mood {
        mood: Mood,
        notes: Option<String>,
    },
    Meal {
        meal: Meal,
        healthy_meals_followed: Option<bool>,
        junk_food_consumed: Option<bool>,
    },
    Vitals(Vitals),
}

impl DimensionWrite {
    pub fn name(&self) -> &'static str {
        match self {
            DimensionWrite::Exercise(_) => "exercise",
            DimensionWrite::Sleep(_) => "sleep",
            DimensionWrite::Hydration(_) => "hydration",
            DimensionWrite::Mood { .. } => "mood",
            DimensionWrite::Meal { .. } => "nutrition",
            DimensionWrite::Vitals(_) => "vitals",
        }
    }

    pub fn apply(self, log: &mut DailyLog) {
        match self {
            DimensionWrite::Exercise(entry) => log.exercise.push(entry),
            DimensionWrite::Sleep(sleep) => log.sleep = Some(sleep),
            DimensionWrite::Hydration(hydration) => log.hydration = Some(hydration),
            DimensionWrite::Mood { mood, notes } => {
                log.mood = Some(mood);
                if notes.is_some() {
                    log.notes = notes;
                }
            }
            DimensionWrite::Meal {
                meal,
                healthy_meals_followed,
                junk_food_consumed,
            } => {
                let nutrition = log.nutrition.get_or_insert_with(Nutrition::default);
                nutrition.meals.push(meal);
                nutrition.total_calories = nutrition.meals.iter().map(Meal::calories).sum();
                if healthy_meals_followed.is_some() {
                    nutrition.healthy_meals_followed = healthy_meals_followed;
                }
                if junk_food_consumed.is_some() {
                    nutrition.junk_food_consumed = junk_food_consumed;
                }
            }
            DimensionWrite::Vitals(vitals) => log.vitals = Some(vitals),
        }
    }
}

/// Dimensions not yet tracked today, in reminder order.
pub fn untracked_dimensions(log: Option<&DailyLog>) -> Vec<&'static str> {
    let mut untracked = Vec::new();
    if log.map_or(true, |l| l.exercise.is_empty()) {
        untracked.push("Exercise");
    }
    if log.and_then(|l| l.hydration.as_ref()).is_none() {
        untracked.push("Hydration");
    }
    if log
        .and_then(|l| l.nutrition.as_ref())
        .map_or(true, |n| n.meals.is_empty())
    {
        untracked.push("Nutrition");
    }
    if log.and_then(|l| l.sleep.as_ref()).is_none() {
        untracked.push("Sleep");
    }
    if log.and_then(|l| l.vitals.as_ref()).is_none() {
        untracked.push("Vitals");
    }
    untracked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_log::{BloodPressure, Food, Intensity, MealType};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn today_log() -> DailyLog {
        DailyLog::empty(Uuid::new_v4(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn run(kind: &str, minutes: f64) -> DimensionWrite {
        DimensionWrite::Exercise(ExerciseEntry {
            kind: kind.into(),
            duration: minutes,
            intensity: Some(Intensity::Medium),
            calories_burned: minutes * 10.0,
            notes: None,
        })
    }

    fn meal(meal_type: MealType, calories: &[f64]) -> DimensionWrite {
        DimensionWrite::Meal {
            meal: Meal {
                meal_type,
                foods: calories
                    .iter()
                    .map(|c| Food {
                        name: "food".into(),
                        calories: *c,
                        protein: 1.0,
                        carbs: 2.0,
                        fats: 3.0,
                    })
                    .collect(),
            },
            healthy_meals_followed: None,
            junk_food_consumed: None,
        }
    }

    #[test]
    fn test_exercise_appends_in_post_order() {
        let mut log = today_log();
        run("Running", 30.0).apply(&mut log);
        run("Cycling", 45.0).apply(&mut log);

        assert_eq!(log.exercise.len(), 2);
        assert_eq!(log.exercise[0].kind, "Running");
        assert_eq!(log.exercise[1].kind, "Cycling");
    }

    #[test]
    fn test_vitals_last_write_wins() {
        let mut log = today_log();
        DimensionWrite::Vitals(Vitals {
            weight: Some(80.0),
            blood_pressure: Some(BloodPressure {
                systolic: Some(130.0),
                diastolic: Some(85.0),
            }),
            heart_rate: Some(70.0),
            medications: vec![],
        })
        .apply(&mut log);
        DimensionWrite::Vitals(Vitals {
            weight: Some(79.5),
            ..Default::default()
        })
        .apply(&mut log);

        let vitals = log.vitals.unwrap();
        assert_eq!(vitals.weight, Some(79.5));
        assert_eq!(vitals.blood_pressure, None);
        assert_eq!(vitals.heart_rate, None);
    }

    #[test]
    fn test_meals_append_and_total_is_recomputed() {
        let mut log = today_log();
        meal(MealType::Breakfast, &[300.0, 150.0]).apply(&mut log);
        meal(MealType::Lunch, &[600.0]).apply(&mut log);

        let nutrition = log.nutrition.unwrap();
        assert_eq!(nutrition.meals.len(), 2);
        assert_eq!(nutrition.meals[1].meal_type, MealType::Lunch);
        assert_eq!(nutrition.total_calories, 1050.0);
    }

    #[test]
    fn test_meal_flags_only_overwrite_when_supplied() {
        let mut log = today_log();
        DimensionWrite::Meal {
            meal: Meal {
                meal_type: MealType::Dinner,
                foods: vec![],
            },
            healthy_meals_followed: Some(true),
            junk_food_consumed: None,
        }
        .apply(&mut log);
        meal(MealType::Snack, &[200.0]).apply(&mut log);

        let nutrition = log.nutrition.unwrap();
        assert_eq!(nutrition.healthy_meals_followed, Some(true));
        assert_eq!(nutrition.junk_food_consumed, None);
    }

    #[test]
    fn test_mood_replaces_and_keeps_notes_when_absent() {
        let mut log = today_log();
        DimensionWrite::Mood {
            mood: Mood::Good,
            notes: Some("slept well".into()),
        }
        .apply(&mut log);
        DimensionWrite::Mood {
            mood: Mood::Great,
            notes: None,
        }
        .apply(&mut log);

        assert_eq!(log.mood, Some(Mood::Great));
        assert_eq!(log.notes.as_deref(), Some("slept well"));
    }

    #[test]
    fn test_writes_leave_other_dimensions_alone() {
        let mut log = today_log();
        run("Yoga", 20.0).apply(&mut log);
        DimensionWrite::Hydration(Hydration {
            water_intake: 1500.0,
            target: 2000.0,
        })
        .apply(&mut log);

        assert_eq!(log.exercise.len(), 1);
        assert!(log.sleep.is_none());
        assert_eq!(log.hydration.unwrap().water_intake, 1500.0);
    }

    #[test]
    fn test_untracked_without_log_lists_everything() {
        assert_eq!(
            untracked_dimensions(None),
            vec!["Exercise", "Hydration", "Nutrition", "Sleep", "Vitals"]
        );
    }

    #[test]
    fn test_untracked_skips_logged_dimensions() {
        let mut log = today_log();
        run("Swim", 40.0).apply(&mut log);
        DimensionWrite::Sleep(Sleep {
            duration: 7.5,
            quality: None,
            sleep_time: None,
            wake_time: None,
            notes: None,
        })
        .apply(&mut log);
        assert_eq!(
            untracked_dimensions(Some(&log)),
            vec!["Hydration", "Nutrition", "Vitals"]
        );
    }
}
