//! Routing and request-rejection behaviour that never reaches the database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dm_training_backend::app::create_router;
use dm_training_backend::app_state::AppState;
use dm_training_backend::config::{
    AppConfig, Config, DatabaseConfig, Environment, FeedConfig, ServerConfig,
};
use dm_training_backend::feed::ChangeHub;
use sqlx::postgres::PgPoolOptions;
use std::net::IpAddr;
use std::time::Duration;
use tower::ServiceExt;

fn test_state() -> AppState {
    let url = "postgres://dm:dm@127.0.0.1:1/dm_training".to_string();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(&url)
        .expect("lazy pool");
    let config = Config {
        server: ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
        },
        database: DatabaseConfig {
            url,
            max_connections: Some(1),
            min_connections: Some(0),
        },
        feed: FeedConfig::default(),
        app: AppConfig {
            name: "DM Training Tracker".to_string(),
            environment: Environment::Development,
        },
    };
    AppState::new(pool, config, ChangeHub::new(8))
}

async fn status_of(request: Request<Body>) -> StatusCode {
    let app = create_router(test_state());
    app.oneshot(request).await.expect("response").status()
}

#[tokio::test]
async fn root_says_hello() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(std::str::from_utf8(&body).unwrap().contains("hello"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let status = status_of(Request::get("/api/nope").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn creating_a_program_requires_a_profile() {
    let request = Request::post("/api/trainings")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_profile_header_is_rejected() {
    let request = Request::post("/api/participants/6f1c0a52-3a43-4b0e-9d55-0d8f1f8c2b11/attendance")
        .header("x-profile-id", "field-officer-7")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_base_layer_is_a_bad_request() {
    let request = Request::get("/api/map/markers?base_layer=terrain")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_uuid_program_id_is_a_bad_request() {
    let request = Request::get("/api/trainings/42/metrics").body(Body::empty()).unwrap();
    assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_update_limit_is_a_bad_request() {
    let request = Request::get("/api/trainings/6f1c0a52-3a43-4b0e-9d55-0d8f1f8c2b11/updates?limit=-1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);

    let request = Request::get("/api/updates/recent?limit=-5").body(Body::empty()).unwrap();
    assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
}
