mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{get, unique};

// Query-string errors are caught before any SQL runs, so these use the
// offline router.

#[tokio::test]
async fn unknown_column_is_rejected() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/listings?select=name,favourite_colour", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {}", res.body);
    assert_eq!(res.body["success"], false);
    Ok(())
}

#[tokio::test]
async fn unknown_operator_is_rejected() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/courses?tuition[between]=1", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {}", res.body);
    Ok(())
}

#[tokio::test]
async fn uncoercible_value_is_rejected() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/courses?tuition[gte]=cheap", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {}", res.body);
    Ok(())
}

#[tokio::test]
async fn select_sort_and_paginate() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let admin = common::admin(&app).await?;
    let tag = unique("Page");

    for i in 1..=12 {
        common::create_listing(&app, &admin, &format!("{} Bootcamp {:02}", tag, i)).await?;
    }

    let res = get(
        &app.router,
        &format!(
            "/listings?account_id={}&select=name,description&sort=-name&page=2&limit=5",
            admin.id
        ),
        None,
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["count"], 5);
    assert_eq!(res.body["pagination"]["prev"], json!({ "page": 1, "limit": 5 }));
    assert_eq!(res.body["pagination"]["next"], json!({ "page": 3, "limit": 5 }));

    let names: Vec<String> = res.body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|l| l["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    let expected: Vec<String> = (3..=7).rev().map(|i| format!("{} Bootcamp {:02}", tag, i)).collect();
    assert_eq!(names, expected);

    let first = &res.body["data"][0];
    assert!(first["id"].is_string());
    assert!(first["description"].is_string());
    assert!(first.get("careers").is_none(), "unexpected field in projection: {}", first);

    let res = get(&app.router, &format!("/listings?account_id={}&page=3&limit=5", admin.id), None).await?;
    assert_eq!(res.body["count"], 2);
    assert!(res.body["pagination"].get("next").is_none());
    Ok(())
}

#[tokio::test]
async fn range_and_membership_filters() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let publisher = common::register(&app, "publisher").await?;
    let listing_id = common::create_listing(&app, &publisher, &unique("Filters ")).await?;

    for tuition in [1_000, 5_000, 9_000] {
        let res = common::post(
            &app.router,
            &format!("/listings/{}/courses", listing_id),
            Some(&publisher.token),
            &json!({
                "title": format!("Course {}", tuition),
                "description": "Filtering",
                "weeks": "4",
                "tuition": tuition,
                "minimum_skill": "intermediate",
            }),
        )
        .await?;
        assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    }

    let res = get(
        &app.router,
        &format!("/listings/{}/courses?tuition[gte]=5000&sort=tuition", listing_id),
        None,
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["count"], 2);
    assert_eq!(res.body["data"][0]["tuition"], 5_000);

    let res = get(
        &app.router,
        &format!("/listings?account_id={}&careers[in]=Business&careers[in]=Other", publisher.id),
        None,
    )
    .await?;
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["data"][0]["courses"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn hidden_account_columns_stay_hidden() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let admin = common::admin(&app).await?;

    let res = get(&app.router, "/users?select=name,password", Some(&admin.token)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = get(&app.router, &format!("/users?email={}", admin.email), Some(&admin.token)).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["count"], 1);
    assert!(res.body["data"][0].get("password").is_none());
    Ok(())
}
