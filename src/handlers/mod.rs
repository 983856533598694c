use axum::{http::StatusCode, Json};
use chrono::NaiveDate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::dto::StatsWindowQuery;
use crate::error::{AppError, AppResult};
use crate::models::daily_log::DailyLog;
use crate::services::{daily_log::DimensionWrite, stats};
use crate::AppState;

pub mod auth;
pub mod custom_logs;
pub mod daily;
pub mod email;
pub mod exercise;
pub mod health;
pub mod hydration;
pub mod nutrition;
pub mod sleep;
pub mod user;
pub mod vitals;

/// Apply one dimension write to the caller's log for today.
async fn track(
    state: &AppState,
    auth_user: &AuthUser,
    write: DimensionWrite,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    let today = state.clock.today();
    let dimension = write.name();
    let log = db::daily_logs::apply_write(&state.db, auth_user.id, today, write).await?;

    tracing::info!(user_id = %auth_user.id, date = %today, dimension, "Daily log updated");
    Ok((StatusCode::CREATED, Json(log)))
}

async fn todays_log(state: &AppState, auth_user: &AuthUser) -> AppResult<Option<DailyLog>> {
    db::daily_logs::find_for_day(&state.db, auth_user.id, state.clock.today()).await
}

/// Resolve the stats window; defaults to the last seven days through today.
fn stats_window(query: &StatsWindowQuery, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let end = query.end_date.unwrap_or(today);
    let start = query.start_date.unwrap_or_else(|| stats::window_start(end));
    if start > end {
        return Err(AppError::Validation(
            "startDate must not be after endDate".into(),
        ));
    }
    Ok((start, end))
}

async fn logs_in_window(
    state: &AppState,
    auth_user: &AuthUser,
    query: &StatsWindowQuery,
) -> AppResult<Vec<DailyLog>> {
    let (start, end) = stats_window(query, state.clock.today())?;
    db::daily_logs::list_between(&state.db, auth_user.id, start, end).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_default_window_is_last_week() {
        let (start, end) = stats_window(&StatsWindowQuery::default(), day(15)).unwrap();
        assert_eq!(start, day(8));
        assert_eq!(end, day(15));
    }

    #[test]
    fn test_explicit_window() {
        let query = StatsWindowQuery {
            start_date: Some(day(1)),
            end_date: Some(day(3)),
        };
        assert_eq!(stats_window(&query, day(15)).unwrap(), (day(1), day(3)));
    }

    #[test]
    fn test_only_end_date_shifts_default_start() {
        let query = StatsWindowQuery {
            start_date: None,
            end_date: Some(day(10)),
        };
        assert_eq!(stats_window(&query, day(15)).unwrap(), (day(3), day(10)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let query = StatsWindowQuery {
            start_date: Some(day(9)),
            end_date: Some(day(2)),
        };
        assert!(matches!(
            stats_window(&query, day(15)),
            Err(AppError::Validation(_))
        ));
    }
}
