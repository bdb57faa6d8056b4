mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let router = common::offline_app()?;

    let res = common::get(&router, "/health", None).await?;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE, "body: {}", res.body);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["error"], "Database unavailable");
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };

    let res = common::get(&app.router, "/health", None).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["data"]["database"], "connected");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_404() -> Result<()> {
    let router = common::offline_app()?;

    let res = common::get(&router, "/nothing-here", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
