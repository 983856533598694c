use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{EmailSettings, User};

/// Insert a user. A duplicate email surfaces as `AppError::Conflict`.
pub async fn create(db: &PgPool, name: &str, email: &str, password_hash: &str) -> AppResult<User> {
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash, email_settings)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(Json(EmailSettings::default()))
    .fetch_one(db)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::Conflict("Email already registered".into()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(db: &PgPool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn update_email_settings(
    db: &PgPool,
    id: Uuid,
    settings: &EmailSettings,
) -> AppResult<EmailSettings> {
    let (Json(stored),) = sqlx::query_as::<_, (Json<EmailSettings>,)>(
        r#"
        UPDATE users SET email_settings = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING email_settings
        "#,
    )
    .bind(id)
    .bind(Json(settings))
    .fetch_optional(db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_email_is_conflict(pool: PgPool) {
        let first = create(&pool, "Ana", "ana@example.com", "hash").await.unwrap();
        assert_eq!(first.email, "ana@example.com");

        let err = create(&pool, "Other Ana", "ana@example.com", "hash")
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected conflict, got {:?}", other),
        }

        let found = find_by_email(&pool, "ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }
}
