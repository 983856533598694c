use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod clock;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;
mod validation;

use auth::rate_limit::RateLimitState;
use clock::{Clock, SystemClock};
use config::Config;
use services::mailer::{self, MailSender};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub mailer: Arc<dyn MailSender>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthtrack_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    let mailer: Arc<dyn MailSender> = Arc::from(mailer::from_config(&config)?);
    if config.mail_api_url.is_none() {
        tracing::warn!("MAIL_API_URL not set; outgoing email will only be logged");
    }

    let rate_limiter = RateLimitState::new(
        config.auth_rate_limit_max,
        config.auth_rate_limit_window_secs,
    );
    spawn_rate_limit_cleanup(rate_limiter.clone());

    let state = AppState {
        db,
        config: config.clone(),
        clock: Arc::new(SystemClock),
        mailer,
        rate_limiter,
    };

    let app = build_router(state)
        .layer(cors_layer(&config)?)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    // Connect info supplies the client IP for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let credential_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(credential_routes);

    let protected_routes = Router::new()
        // Daily tracking
        .route("/api/exercise", post(handlers::exercise::track_exercise))
        .route("/api/exercise/today", get(handlers::exercise::today))
        .route("/api/exercise/stats", get(handlers::exercise::exercise_stats))
        .route("/api/sleep", post(handlers::sleep::track_sleep))
        .route("/api/sleep/today", get(handlers::sleep::today))
        .route("/api/sleep/stats", get(handlers::sleep::sleep_stats))
        .route("/api/hydration", post(handlers::hydration::track_hydration))
        .route("/api/hydration/today", get(handlers::hydration::today))
        .route("/api/hydration/stats", get(handlers::hydration::hydration_stats))
        .route("/api/nutrition", post(handlers::nutrition::track_meal))
        .route("/api/nutrition/today", get(handlers::nutrition::today))
        .route("/api/nutrition/stats", get(handlers::nutrition::nutrition_stats))
        .route("/api/vitals", post(handlers::vitals::track_vitals))
        .route("/api/vitals/today", get(handlers::vitals::today))
        .route("/api/vitals/stats", get(handlers::vitals::vitals_stats))
        .route("/api/daily/mood", post(handlers::daily::track_mood))
        .route("/api/daily/today", get(handlers::daily::today))
        .route("/api/dashboard/summary", get(handlers::daily::dashboard_summary))
        // Settings & email
        .route(
            "/api/user/email-settings",
            get(handlers::user::get_email_settings).put(handlers::user::update_email_settings),
        )
        .route("/api/email/weekly-report", post(handlers::email::send_weekly_report))
        .route(
            "/api/email/tracking-reminder",
            post(handlers::email::send_tracking_reminder),
        )
        .route("/api/email/milestone", post(handlers::email::send_milestone))
        .route("/api/email/test", post(handlers::email::send_test_email))
        // Custom logs
        .route(
            "/api/custom-logs/definitions",
            post(handlers::custom_logs::create_definition)
                .get(handlers::custom_logs::list_definitions),
        )
        .route(
            "/api/custom-logs/definitions/:id",
            delete(handlers::custom_logs::delete_definition),
        )
        .route(
            "/api/custom-logs/entries",
            post(handlers::custom_logs::create_entry).get(handlers::custom_logs::list_entries),
        )
        .route("/api/custom-logs/stats", get(handlers::custom_logs::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config
        .frontend_url
        .parse::<HeaderValue>()
        .context("FRONTEND_URL is not a valid origin")?];
    for extra in &config.cors_extra_origins {
        match extra.parse::<HeaderValue>() {
            Ok(origin) => origins.push(origin),
            Err(_) => tracing::warn!(origin = %extra, "Ignoring invalid CORS origin"),
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true))
}

fn spawn_rate_limit_cleanup(limiter: RateLimitState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::connect_info::MockConnectInfo,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    use crate::clock::FixedClock;
    use crate::services::mailer::testing::RecordingMailer;

    // The pool never connects; every request here is answered before a query runs.
    fn test_app() -> Router {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let state = AppState {
            db,
            rate_limiter: RateLimitState::new(config.auth_rate_limit_max, 60),
            config: Arc::new(config),
            clock: Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())),
            mailer: Arc::new(RecordingMailer::default()),
        };
        build_router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "healthtrack-api");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = test_app()
            .oneshot(Request::get("/api/exercise/today").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Please authenticate");
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let request = Request::get("/api/dashboard/summary")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Please authenticate");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let other = Config {
            jwt_secret: "someone-else".into(),
            ..Config::for_tests()
        };
        let token = auth::jwt::create_token(uuid::Uuid::new_v4(), &other).unwrap();
        let request = Request::post("/api/custom-logs/entries")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation_error() {
        let response = test_app()
            .oneshot(post_json(
                "/register",
                r#"{"name":"Ana","email":"ana@example.com","password":"short"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Password must be 8-128 characters"
        );
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = test_app();
        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(post_json("/login", r#"{"email":"","password":""}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .clone()
            .oneshot(post_json("/login", r#"{"email":"","password":""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_json(response).await["message"], "Too many requests");

        // /register keeps its own bucket
        let response = app
            .oneshot(post_json("/register", r#"{"name":"","email":"x","password":""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cors_rejects_invalid_frontend_url() {
        let config = Config {
            frontend_url: "bad\norigin".into(),
            ..Config::for_tests()
        };
        assert!(cors_layer(&config).is_err());
    }
}
