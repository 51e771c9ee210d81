mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_database_ok() -> Result<()> {
    let Some(server) = common::spawn_server().await? else {
        return Ok(());
    };

    let res = server.client.get(server.url("/api/health")).send().await?;
    let (status, body) = common::read(res).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let Some(server) = common::spawn_server().await? else {
        return Ok(());
    };

    let res = server.client.get(server.url("/api/tidak-ada")).send().await?;
    let (status, body) = common::read(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    Ok(())
}
