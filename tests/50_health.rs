mod common;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use common::Front;
use farmacia_web::{app, config::AppConfig, AppState};

#[tokio::test]
async fn health_reports_backend_status() -> Result<()> {
    let front = Front::start().await?;

    let page = front.get("/health", None).await?;
    assert_eq!(page.status, StatusCode::OK);

    let body: Value = serde_json::from_str(&page.body)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["sessions"], 0);
    assert_eq!(body["data"]["backend"]["url"], front.api.base_url.as_str());
    // Unauthenticated probe still proves the API is up
    assert_eq!(body["data"]["backend"]["status"], 401);

    Ok(())
}

#[tokio::test]
async fn health_counts_sessions() -> Result<()> {
    let front = Front::start().await?;
    front.login(common::CLIENTE).await?;

    let page = front.get("/health", None).await?;
    let body: Value = serde_json::from_str(&page.body)?;
    assert_eq!(body["data"]["sessions"], 1);

    Ok(())
}

#[tokio::test]
async fn health_degrades_when_backend_is_down() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("no free port");
    let config = AppConfig::development().with_backend_url(&format!("http://127.0.0.1:{}", port));
    let router = app(AppState::new(config)?);

    let response = router
        .oneshot(Request::get("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "backend unavailable");
    assert_eq!(body["data"]["status"], "degraded");

    Ok(())
}

#[tokio::test]
async fn stylesheet_is_served() -> Result<()> {
    let front = Front::start().await?;
    let page = front.get("/static/app.css", None).await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(".navbar"));
    Ok(())
}
