use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::custom_log::EntryValue;

pub const STATS_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Walk entry dates (newest first) back from `now` while consecutive entries
/// are at most one whole day apart. The first larger gap ends the walk.
pub fn calculate_streak(dates_desc: &[DateTime<Utc>], now: DateTime<Utc>) -> Streak {
    let mut streak = Streak::default();
    let mut reference = now;

    for &date in dates_desc {
        let gap_days = (reference - date).num_days();
        if gap_days > 1 {
            break;
        }
        streak.current_streak += 1;
        streak.longest_streak = streak.longest_streak.max(streak.current_streak);
        reference = date;
    }

    streak
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub total: usize,
    pub average_per_week: f64,
    pub average_per_month: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

/// Start of the default stats window ending at `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STATS_WINDOW_DAYS)
}

/// Count of entries, plus min/max/average when the values are numeric.
pub fn window_stats<'a, I>(values: I) -> WindowStats
where
    I: IntoIterator<Item = &'a EntryValue>,
{
    let mut stats = WindowStats::default();
    let mut numbers = Vec::new();
    for value in values {
        stats.total += 1;
        if let Some(n) = value.as_number() {
            numbers.push(n);
        }
    }

    if !numbers.is_empty() && numbers.len() == stats.total {
        let sum: f64 = numbers.iter().sum();
        stats.min = numbers.iter().copied().reduce(f64::min);
        stats.max = numbers.iter().copied().reduce(f64::max);
        stats.average = Some(sum / numbers.len() as f64);
    }

    stats
}
