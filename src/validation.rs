use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its `validator` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + 'static,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Malformed JSON and unknown enum values are rejected here.
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(AppError::from)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// `Json` whose rejection renders as an `AppError`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection renders as an `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection renders as an `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{LoginRequest, StatsWindowQuery};
    use crate::models::user::EmailSettingsUpdate;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, StatusCode},
        response::Response,
        routing::{delete, get, put},
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn rejection_router() -> Router {
        Router::new()
            .route(
                "/stats",
                get(|AppQuery(q): AppQuery<StatsWindowQuery>| async move {
                    format!("{:?}", q.start_date)
                }),
            )
            .route(
                "/definitions/:id",
                delete(|AppPath(id): AppPath<Uuid>| async move { id.to_string() }),
            )
            .route(
                "/settings",
                put(|AppJson(update): AppJson<EmailSettingsUpdate>| async move {
                    format!("{:?}", update.weekly_report)
                }),
            )
    }

    async fn json_error(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_query_date_is_json_error() {
        let request = axum::http::Request::get("/stats?startDate=yesterday")
            .body(Body::empty())
            .unwrap();
        let response = rejection_router().oneshot(request).await.unwrap();
        let (status, body) = json_error(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("query string"));
    }

    #[tokio::test]
    async fn test_good_query_date_passes() {
        let request = axum::http::Request::get("/stats?startDate=2024-05-01")
            .body(Body::empty())
            .unwrap();
        let response = rejection_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_path_uuid_is_json_error() {
        let request = axum::http::Request::delete("/definitions/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = rejection_router().oneshot(request).await.unwrap();
        let (status, body) = json_error(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_settings_body_is_json_error() {
        let request = axum::http::Request::put("/settings")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"weeklyReport": "sometimes"}"#))
            .unwrap();
        let response = rejection_router().oneshot(request).await.unwrap();
        let (status, body) = json_error(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let req = json_request(r#"{"email":"a@example.com","password":"secret123"}"#);
        let ValidatedJson(body) = ValidatedJson::<LoginRequest>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(body.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let req = json_request(r#"{"email": "#);
        let err = ValidatedJson::<LoginRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_rule_is_validation_error() {
        let req = json_request(r#"{"email":"","password":"x"}"#);
        let err = ValidatedJson::<LoginRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Email is required"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
