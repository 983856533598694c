use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::dto::CreateDefinitionRequest;
use crate::error::AppResult;
use crate::models::custom_log::{CustomLogDefinition, CustomLogEntry, EntryValue};

pub async fn create_definition(
    db: &PgPool,
    user_id: Uuid,
    body: &CreateDefinitionRequest,
) -> AppResult<CustomLogDefinition> {
    let definition = sqlx::query_as::<_, CustomLogDefinition>(
        r#"
        INSERT INTO custom_log_definitions (
            id, user_id, name, description, field_type, options, icon, color,
            track_streak, reminder_enabled, reminder_time, category
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(body.name.trim())
    .bind(&body.description)
    .bind(body.field_type)
    .bind(Json(&body.options))
    .bind(&body.icon)
    .bind(&body.color)
    .bind(body.track_streak.unwrap_or(true))
    .bind(body.reminder_enabled.unwrap_or(false))
    .bind(body.reminder_time)
    .bind(body.category.unwrap_or_default())
    .fetch_one(db)
    .await?;

    Ok(definition)
}

pub async fn list_active_definitions(db: &PgPool, user_id: Uuid) -> AppResult<Vec<CustomLogDefinition>> {
    let definitions = sqlx::query_as::<_, CustomLogDefinition>(
        r#"
        SELECT * FROM custom_log_definitions
        WHERE user_id = $1 AND active = true
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(definitions)
}

/// Active or inactive definition owned by `user_id`.
pub async fn find_definition(
    db: &PgPool,
    user_id: Uuid,
    definition_id: Uuid,
) -> AppResult<Option<CustomLogDefinition>> {
    let definition = sqlx::query_as::<_, CustomLogDefinition>(
        "SELECT * FROM custom_log_definitions WHERE id = $1 AND user_id = $2",
    )
    .bind(definition_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(definition)
}

pub async fn find_definitions_by_ids(
    db: &PgPool,
    user_id: Uuid,
    ids: &[Uuid],
) -> AppResult<Vec<CustomLogDefinition>> {
    let definitions = sqlx::query_as::<_, CustomLogDefinition>(
        "SELECT * FROM custom_log_definitions WHERE user_id = $1 AND id = ANY($2)",
    )
    .bind(user_id)
    .bind(ids)
    .fetch_all(db)
    .await?;

    Ok(definitions)
}

/// Returns false when no owned, active definition matched.
pub async fn deactivate_definition(db: &PgPool, user_id: Uuid, definition_id: Uuid) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE custom_log_definitions SET active = false, updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND active = true
        "#,
    )
    .bind(definition_id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_entry(
    db: &PgPool,
    user_id: Uuid,
    definition_id: Uuid,
    date: DateTime<Utc>,
    value: &EntryValue,
    notes: Option<&str>,
    tags: &[String],
) -> AppResult<CustomLogEntry> {
    let entry = sqlx::query_as::<_, CustomLogEntry>(
        r#"
        INSERT INTO custom_log_entries (id, user_id, definition_id, entry_date, value, notes, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(definition_id)
    .bind(date)
    .bind(Json(value))
    .bind(notes)
    .bind(tags)
    .fetch_one(db)
    .await?;

    Ok(entry)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EntryFilter {
    pub definition_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Entries matching `filter`, newest first.
pub async fn list_entries(db: &PgPool, user_id: Uuid, filter: EntryFilter) -> AppResult<Vec<CustomLogEntry>> {
    let entries = sqlx::query_as::<_, CustomLogEntry>(
        r#"
        SELECT * FROM custom_log_entries
        WHERE user_id = $1
          AND ($2::UUID IS NULL OR definition_id = $2)
          AND ($3::TIMESTAMPTZ IS NULL OR entry_date >= $3)
          AND ($4::TIMESTAMPTZ IS NULL OR entry_date <= $4)
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .bind(filter.definition_id)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(db)
    .await?;

    Ok(entries)
}

/// Every entry date for one definition, newest first.
pub async fn entry_dates(db: &PgPool, user_id: Uuid, definition_id: Uuid) -> AppResult<Vec<DateTime<Utc>>> {
    let dates = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT entry_date FROM custom_log_entries
        WHERE user_id = $1 AND definition_id = $2
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .bind(definition_id)
    .fetch_all(db)
    .await?;

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn definition(name: &str, field_type: &str) -> CreateDefinitionRequest {
        serde_json::from_value(json!({ "name": name, "fieldType": field_type })).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_entries_newest_first_across_definitions(pool: PgPool) {
        let user = crate::db::users::create(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();
        let other = crate::db::users::create(&pool, "Bo", "bo@example.com", "hash")
            .await
            .unwrap();
        let water = create_definition(&pool, user.id, &definition("Water", "number"))
            .await
            .unwrap();
        let meditated = create_definition(&pool, user.id, &definition("Meditated", "boolean"))
            .await
            .unwrap();
        let theirs = create_definition(&pool, other.id, &definition("Steps", "number"))
            .await
            .unwrap();

        let day = |d: u32| Utc.with_ymd_and_hms(2024, 6, d, 9, 0, 0).unwrap();
        create_entry(&pool, user.id, water.id, day(1), &EntryValue::Number(2.0), None, &[])
            .await
            .unwrap();
        create_entry(&pool, user.id, meditated.id, day(3), &EntryValue::Boolean(true), None, &[])
            .await
            .unwrap();
        create_entry(&pool, user.id, water.id, day(2), &EntryValue::Number(1.5), Some("gym"), &[])
            .await
            .unwrap();
        create_entry(&pool, other.id, theirs.id, day(4), &EntryValue::Number(9000.0), None, &[])
            .await
            .unwrap();

        let entries = list_entries(&pool, user.id, EntryFilter::default()).await.unwrap();
        let dates: Vec<_> = entries.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        assert_eq!(entries[0].definition_id, meditated.id);
        assert!(entries.iter().all(|e| e.user_id == user.id));

        let water_only = list_entries(
            &pool,
            user.id,
            EntryFilter {
                definition_id: Some(water.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(water_only.len(), 2);
        assert_eq!(water_only[0].notes.as_deref(), Some("gym"));
    }
}
