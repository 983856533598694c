//! Weekly summaries over a window of daily logs.
//!
//! Every function is pure; callers fetch the window and pass the logs in.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::daily_log::{DailyLog, SleepQuality};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// First day of the default stats window ending on `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(DEFAULT_WINDOW_DAYS)
}

fn average(total: f64, days: u32) -> f64 {
    if days == 0 {
        0.0
    } else {
        total / f64::from(days)
    }
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
    pub total_workouts: u32,
    pub total_minutes: f64,
    pub total_calories: f64,
    pub workouts_by_type: BTreeMap<String, u32>,
}

pub fn exercise_stats(logs: &[DailyLog]) -> ExerciseStats {
    let mut stats = ExerciseStats::default();
    for entry in logs.iter().flat_map(|l| &l.exercise) {
        stats.total_workouts += 1;
        stats.total_minutes += entry.duration;
        stats.total_calories += entry.calories_burned;
        *stats.workouts_by_type.entry(entry.kind.clone()).or_insert(0) += 1;
    }
    stats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QualityDistribution {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
    pub poor: u32,
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepStats {
    pub average_duration: f64,
    pub quality_distribution: QualityDistribution,
    pub total_sleep_hours: f64,
    pub days_logged: u32,
}

pub fn sleep_stats(logs: &[DailyLog]) -> SleepStats {
    let mut stats = SleepStats::default();
    for sleep in logs.iter().filter_map(|l| l.sleep.as_ref()) {
        stats.total_sleep_hours += sleep.duration;
        stats.days_logged += 1;
        match sleep.quality {
            Some(SleepQuality::Excellent) => stats.quality_distribution.excellent += 1,
            Some(SleepQuality::Good) => stats.quality_distribution.good += 1,
            Some(SleepQuality::Fair) => stats.quality_distribution.fair += 1,
            Some(SleepQuality::Poor) => stats.quality_distribution.poor += 1,
            None => {}
        }
    }
    stats.average_duration = average(stats.total_sleep_hours, stats.days_logged);
    stats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydrationStats {
    pub average_intake: f64,
    pub total_intake: f64,
    pub days_logged: u32,
    pub target_achieved_days: u32,
}

/// Days with zero intake do not count as logged.
pub fn hydration_stats(logs: &[DailyLog]) -> HydrationStats {
    let mut stats = HydrationStats::default();
    for hydration in logs
        .iter()
        .filter_map(|l| l.hydration.as_ref())
        .filter(|h| h.water_intake > 0.0)
    {
        stats.total_intake += hydration.water_intake;
        stats.days_logged += 1;
        if hydration.water_intake >= hydration.target {
            stats.target_achieved_days += 1;
        }
    }
    stats.average_intake = average(stats.total_intake, stats.days_logged);
    stats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroAverages {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub average_calories: f64,
    pub total_meals: u32,
    pub days_with_logs: u32,
    pub meal_type_distribution: BTreeMap<&'static str, u32>,
    pub macro_averages: MacroAverages,
}

pub fn nutrition_stats(logs: &[DailyLog]) -> NutritionStats {
    let mut stats = NutritionStats::default();
    let mut calories = 0.0;
    for nutrition in logs
        .iter()
        .filter_map(|l| l.nutrition.as_ref())
        .filter(|n| !n.meals.is_empty())
    {
        stats.days_with_logs += 1;
        calories += nutrition.total_calories;
        for meal in &nutrition.meals {
            stats.total_meals += 1;
            *stats
                .meal_type_distribution
                .entry(meal.meal_type.as_str())
                .or_insert(0) += 1;
            for food in &meal.foods {
                stats.macro_averages.protein += food.protein;
                stats.macro_averages.carbs += food.carbs;
                stats.macro_averages.fats += food.fats;
            }
        }
    }

    let days = stats.days_with_logs;
    stats.average_calories = average(calories, days);
    stats.macro_averages.protein = average(stats.macro_averages.protein, days);
    stats.macro_averages.carbs = average(stats.macro_averages.carbs, days);
    stats.macro_averages.fats = average(stats.macro_averages.fats, days);
    stats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalsStats {
    pub average_weight: f64,
    pub average_heart_rate: f64,
    pub average_systolic: f64,
    pub average_diastolic: f64,
    pub medications_tracked: u32,
    pub days_logged: u32,
}

/// Averages divide by days with any vitals record, not by days on which the
/// particular field was present.
pub fn vitals_stats(logs: &[DailyLog]) -> VitalsStats {
    let mut stats = VitalsStats::default();
    let (mut weight, mut heart_rate, mut systolic, mut diastolic) = (0.0, 0.0, 0.0, 0.0);
    for vitals in logs.iter().filter_map(|l| l.vitals.as_ref()) {
        stats.days_logged += 1;
        weight += vitals.weight.unwrap_or(0.0);
        heart_rate += vitals.heart_rate.unwrap_or(0.0);
        if let Some(bp) = &vitals.blood_pressure {
            systolic += bp.systolic.unwrap_or(0.0);
            diastolic += bp.diastolic.unwrap_or(0.0);
        }
        stats.medications_tracked += vitals.medications.len() as u32;
    }

    let days = stats.days_logged;
    stats.average_weight = average(weight, days);
    stats.average_heart_rate = average(heart_rate, days);
    stats.average_systolic = average(systolic, days);
    stats.average_diastolic = average(diastolic, days);
    stats
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub total_workouts: u32,
    pub avg_water_intake: f64,
    pub avg_sleep_hours: f64,
}

/// Dashboard averages divide by the number of logs in the week.
pub fn week_summary(week_logs: &[DailyLog]) -> WeekSummary {
    let days = week_logs.len() as u32;
    let water: f64 = week_logs
        .iter()
        .filter_map(|l| l.hydration.as_ref())
        .map(|h| h.water_intake)
        .sum();
    let sleep: f64 = week_logs
        .iter()
        .filter_map(|l| l.sleep.as_ref())
        .map(|s| s.duration)
        .sum();

    WeekSummary {
        total_workouts: week_logs.iter().map(|l| l.exercise.len() as u32).sum(),
        avg_water_intake: average(water, days),
        avg_sleep_hours: average(sleep, days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_log::{
        BloodPressure, ExerciseEntry, Food, Hydration, Meal, MealType, Medication, Nutrition,
        Sleep, Vitals,
    };
    use uuid::Uuid;

    fn day(n: u32) -> DailyLog {
        DailyLog::empty(Uuid::nil(), NaiveDate::from_ymd_opt(2024, 6, n).unwrap())
    }

    fn exercise(kind: &str, duration: f64, calories: f64) -> ExerciseEntry {
        ExerciseEntry {
            kind: kind.into(),
            duration,
            intensity: None,
            calories_burned: calories,
            notes: None,
        }
    }

    fn sleep(duration: f64, quality: Option<SleepQuality>) -> Sleep {
        Sleep {
            duration,
            quality,
            sleep_time: None,
            wake_time: None,
            notes: None,
        }
    }

    #[test]
    fn test_window_start_is_seven_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(window_start(today), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn test_exercise_totals_and_grouping() {
        let mut a = day(1);
        a.exercise = vec![exercise("Running", 30.0, 300.0), exercise("Yoga", 20.0, 80.0)];
        let mut b = day(2);
        b.exercise = vec![exercise("Running", 40.0, 400.0)];

        let stats = exercise_stats(&[a, b, day(3)]);
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_minutes, 90.0);
        assert_eq!(stats.total_calories, 780.0);
        assert_eq!(stats.workouts_by_type["Running"], 2);
        assert_eq!(stats.workouts_by_type["Yoga"], 1);
    }

    #[test]
    fn test_empty_week_of_sleep_averages_to_zero() {
        let stats = sleep_stats(&[day(1), day(2)]);
        assert_eq!(stats.days_logged, 0);
        assert_eq!(stats.average_duration, 0.0);
        assert!(!stats.average_duration.is_nan());

        assert_eq!(sleep_stats(&[]).average_duration, 0.0);
    }

    #[test]
    fn test_sleep_quality_only_counted_when_set() {
        let mut a = day(1);
        a.sleep = Some(sleep(8.0, Some(SleepQuality::Good)));
        let mut b = day(2);
        b.sleep = Some(sleep(6.0, None));

        let stats = sleep_stats(&[a, b]);
        assert_eq!(stats.days_logged, 2);
        assert_eq!(stats.total_sleep_hours, 14.0);
        assert_eq!(stats.average_duration, 7.0);
        assert_eq!(stats.quality_distribution.good, 1);
        assert_eq!(
            stats.quality_distribution.excellent
                + stats.quality_distribution.fair
                + stats.quality_distribution.poor,
            0
        );

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["qualityDistribution"]["Good"], 1);
        assert_eq!(json["qualityDistribution"]["Excellent"], 0);
    }

    #[test]
    fn test_hydration_target_achievement() {
        let mut a = day(1);
        a.hydration = Some(Hydration {
            water_intake: 2500.0,
            target: 2000.0,
        });
        let mut b = day(2);
        b.hydration = Some(Hydration {
            water_intake: 1500.0,
            target: 2000.0,
        });
        let mut c = day(3);
        c.hydration = Some(Hydration::default());

        let stats = hydration_stats(&[a, b, c]);
        assert_eq!(stats.days_logged, 2);
        assert_eq!(stats.total_intake, 4000.0);
        assert_eq!(stats.average_intake, 2000.0);
        assert_eq!(stats.target_achieved_days, 1);
    }

    #[test]
    fn test_nutrition_macros_average_over_days_with_meals() {
        let food = |calories, protein| Food {
            name: "x".into(),
            calories,
            protein,
            carbs: 10.0,
            fats: 5.0,
        };
        let mut a = day(1);
        a.nutrition = Some(Nutrition {
            meals: vec![
                Meal {
                    meal_type: MealType::Breakfast,
                    foods: vec![food(400.0, 20.0)],
                },
                Meal {
                    meal_type: MealType::Dinner,
                    foods: vec![food(800.0, 40.0)],
                },
            ],
            total_calories: 1200.0,
            ..Default::default()
        });
        let mut b = day(2);
        b.nutrition = Some(Nutrition {
            meals: vec![Meal {
                meal_type: MealType::Breakfast,
                foods: vec![food(600.0, 30.0)],
            }],
            total_calories: 600.0,
            ..Default::default()
        });
        let mut c = day(3);
        c.nutrition = Some(Nutrition::default());

        let stats = nutrition_stats(&[a, b, c]);
        assert_eq!(stats.days_with_logs, 2);
        assert_eq!(stats.total_meals, 3);
        assert_eq!(stats.average_calories, 900.0);
        assert_eq!(stats.meal_type_distribution["Breakfast"], 2);
        assert_eq!(stats.meal_type_distribution["Dinner"], 1);
        assert_eq!(stats.macro_averages.protein, 45.0);
        assert_eq!(stats.macro_averages.carbs, 15.0);
        assert_eq!(stats.macro_averages.fats, 7.5);
    }

    #[test]
    fn test_nutrition_without_meals_is_all_zero() {
        assert_eq!(nutrition_stats(&[day(1)]), NutritionStats::default());
    }

    #[test]
    fn test_vitals_divide_by_days_with_any_vitals() {
        let mut a = day(1);
        a.vitals = Some(Vitals {
            weight: Some(80.0),
            blood_pressure: Some(BloodPressure {
                systolic: Some(120.0),
                diastolic: Some(80.0),
            }),
            heart_rate: Some(60.0),
            medications: vec![Medication {
                name: "Vitamin D".into(),
                dosage: Some("1000 IU".into()),
                taken: true,
                time: None,
            }],
        });
        let mut b = day(2);
        b.vitals = Some(Vitals {
            heart_rate: Some(70.0),
            ..Default::default()
        });

        let stats = vitals_stats(&[a, b, day(3)]);
        assert_eq!(stats.days_logged, 2);
        // Weight was only recorded once but still divides by two days.
        assert_eq!(stats.average_weight, 40.0);
        assert_eq!(stats.average_heart_rate, 65.0);
        assert_eq!(stats.average_systolic, 60.0);
        assert_eq!(stats.average_diastolic, 40.0);
        assert_eq!(stats.medications_tracked, 1);
    }

    #[test]
    fn test_week_summary_divides_by_week_logs() {
        let mut a = day(1);
        a.exercise = vec![exercise("Walk", 30.0, 100.0)];
        a.hydration = Some(Hydration {
            water_intake: 3000.0,
            target: 2000.0,
        });
        let mut b = day(2);
        b.sleep = Some(sleep(8.0, None));

        let summary = week_summary(&[a, b]);
        assert_eq!(summary.total_workouts, 1);
        assert_eq!(summary.avg_water_intake, 1500.0);
        assert_eq!(summary.avg_sleep_hours, 4.0);
    }

    #[test]
    fn test_week_summary_empty_is_zero() {
        assert_eq!(week_summary(&[]), WeekSummary::default());
    }
}
