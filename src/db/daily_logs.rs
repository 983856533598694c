use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::daily_log::{DailyLog, DailyLogRow};
use crate::services::daily_log::DimensionWrite;
use crate::services::notifications::{
    ExerciseReport, HydrationReport, NutritionReport, SleepReport, WeeklyReport,
};

/// Create-or-get the day's log and apply one dimension write, atomically.
///
/// The insert never fails on the (user_id, log_date) constraint, and the row
/// lock serializes concurrent writers for the same day.
pub async fn apply_write(
    db: &PgPool,
    user_id: Uuid,
    day: NaiveDate,
    write: DimensionWrite,
) -> AppResult<DailyLog> {
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO daily_logs (id, user_id, log_date)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, log_date) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(day)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, DailyLogRow>(
        "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2 FOR UPDATE",
    )
    .bind(user_id)
    .bind(day)
    .fetch_one(&mut *tx)
    .await?;

    let mut log = DailyLog::from(row);
    write.apply(&mut log);

    let row = sqlx::query_as::<_, DailyLogRow>(
        r#"
        UPDATE daily_logs SET
            mood = $2,
            notes = $3,
            hydration = $4,
            sleep = $5,
            exercise = $6,
            nutrition = $7,
            vitals = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(log.id)
    .bind(log.mood)
    .bind(&log.notes)
    .bind(log.hydration.as_ref().map(Json))
    .bind(log.sleep.as_ref().map(Json))
    .bind(Json(&log.exercise))
    .bind(log.nutrition.as_ref().map(Json))
    .bind(log.vitals.as_ref().map(Json))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(row.into())
}

pub async fn find_for_day(db: &PgPool, user_id: Uuid, day: NaiveDate) -> AppResult<Option<DailyLog>> {
    let row = sqlx::query_as::<_, DailyLogRow>(
        "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2",
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(db)
    .await?;

    Ok(row.map(DailyLog::from))
}

/// Logs with `start <= log_date <= end`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<DailyLog>> {
    let rows = sqlx::query_as::<_, DailyLogRow>(
        r#"
        SELECT * FROM daily_logs
        WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
        ORDER BY log_date ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(DailyLog::from).collect())
}

/// Weekly report figures for logs on or after `since`, from four aggregate
/// queries run concurrently.
pub async fn weekly_report(db: &PgPool, user_id: Uuid, since: NaiveDate) -> AppResult<WeeklyReport> {
    let (exercise, sleep, hydration, nutrition) = tokio::try_join!(
        exercise_totals(db, user_id, since),
        sleep_totals(db, user_id, since),
        hydration_totals(db, user_id, since),
        nutrition_totals(db, user_id, since),
    )?;

    Ok(WeeklyReport {
        exercise,
        sleep,
        hydration,
        nutrition,
    })
}

async fn exercise_totals(db: &PgPool, user_id: Uuid, since: NaiveDate) -> AppResult<ExerciseReport> {
    let (total_workouts, total_minutes, total_calories) =
        sqlx::query_as::<_, (i64, f64, f64)>(
            r#"
            SELECT
                COALESCE(SUM(jsonb_array_length(d.exercise)), 0)::BIGINT,
                COALESCE(SUM(x.minutes), 0)::FLOAT8,
                COALESCE(SUM(x.calories), 0)::FLOAT8
            FROM daily_logs d
            LEFT JOIN LATERAL (
                SELECT
                    SUM((e->>'duration')::FLOAT8) AS minutes,
                    SUM((e->>'caloriesBurned')::FLOAT8) AS calories
                FROM jsonb_array_elements(d.exercise) e
            ) x ON TRUE
            WHERE d.user_id = $1 AND d.log_date >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(db)
        .await?;

    Ok(ExerciseReport {
        total_workouts,
        total_minutes,
        total_calories,
    })
}

async fn sleep_totals(db: &PgPool, user_id: Uuid, since: NaiveDate) -> AppResult<SleepReport> {
    let (average_duration, days_logged) = sqlx::query_as::<_, (f64, i64)>(
        r#"
        SELECT
            COALESCE(AVG((sleep->>'duration')::FLOAT8), 0)::FLOAT8,
            COUNT(sleep)::BIGINT
        FROM daily_logs
        WHERE user_id = $1 AND log_date >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(db)
    .await?;

    Ok(SleepReport {
        average_duration,
        days_logged,
    })
}

async fn hydration_totals(db: &PgPool, user_id: Uuid, since: NaiveDate) -> AppResult<HydrationReport> {
    let (average_intake, target_achieved_days) = sqlx::query_as::<_, (f64, i64)>(
        r#"
        SELECT
            COALESCE(AVG((hydration->>'waterIntake')::FLOAT8), 0)::FLOAT8,
            COALESCE(SUM(
                CASE WHEN (hydration->>'waterIntake')::FLOAT8 >= (hydration->>'target')::FLOAT8
                THEN 1 ELSE 0 END
            ), 0)::BIGINT
        FROM daily_logs
        WHERE user_id = $1 AND log_date >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(db)
    .await?;

    Ok(HydrationReport {
        average_intake,
        target_achieved_days,
    })
}

async fn nutrition_totals(db: &PgPool, user_id: Uuid, since: NaiveDate) -> AppResult<NutritionReport> {
    let (average_calories, total_meals) = sqlx::query_as::<_, (f64, i64)>(
        r#"
        SELECT
            COALESCE(AVG((nutrition->>'totalCalories')::FLOAT8), 0)::FLOAT8,
            COALESCE(SUM(jsonb_array_length(COALESCE(nutrition->'meals', '[]'::jsonb))), 0)::BIGINT
        FROM daily_logs
        WHERE user_id = $1 AND log_date >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(db)
    .await?;

    Ok(NutritionReport {
        average_calories,
        total_meals,
    })
}
