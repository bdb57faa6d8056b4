mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use serde_json::json;

use common::{get, post, put, RecordingMailer};

#[tokio::test]
async fn protected_route_requires_bearer_token() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/auth/me", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED, "body: {}", res.body);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["error"], "Not authorized to access this route");

    let res = get(&router, "/auth/me", Some("not-a-jwt")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED, "body: {}", res.body);
    Ok(())
}

#[tokio::test]
async fn write_routes_are_guarded_before_validation() -> Result<()> {
    let router = common::offline_app()?;

    let res = post(&router, "/listings", None, &json!({})).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&router, "/users", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let router = common::offline_app()?;

    let res = post(&router, "/auth/login", None, &json!({ "email": "john@gmail.com" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Please provide an email and password");
    Ok(())
}

#[tokio::test]
async fn register_reports_every_violation() -> Result<()> {
    let router = common::offline_app()?;

    let res = post(&router, "/auth/register", None, &json!({ "email": "nope", "password": "123" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["error"],
        "Please add a name, Please add a valid email, Password must be at least 6 characters"
    );

    let res = post(
        &router,
        "/auth/register",
        None,
        &json!({ "name": "Root", "email": "root@example.com", "password": "123456", "role": "admin" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Please choose a role of user or publisher");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_client_error() -> Result<()> {
    let router = common::offline_app()?;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri(format!("{}/auth/login", common::PREFIX))
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"email\":"))?;
    let res = common::send(&router, request).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/auth/logout", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!({}));
    let cookie = res.headers[header::SET_COOKIE].to_str()?;
    assert!(cookie.starts_with("token=none"), "cookie: {}", cookie);
    assert!(cookie.contains("HttpOnly"));
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let session = common::register(&app, "publisher").await?;

    let res = post(
        &app.router,
        "/auth/login",
        None,
        &json!({ "email": session.email, "password": "123456" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert!(res.body["token"].is_string());
    let cookie = res.headers[header::SET_COOKIE].to_str()?;
    assert!(cookie.starts_with("token="));

    let me = get(&app.router, "/auth/me", Some(&session.token)).await?;
    assert_eq!(me.body["data"]["role"], "publisher");
    assert_eq!(me.body["data"]["email"], session.email.as_str());
    assert!(me.body["data"].get("password").is_none(), "password leaked: {}", me.body);

    let res = post(
        &app.router,
        "/auth/login",
        None,
        &json!({ "email": session.email, "password": "wrong-password" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let session = common::register(&app, "user").await?;

    let res = post(
        &app.router,
        "/auth/register",
        None,
        &json!({ "name": "Again", "email": session.email, "password": "123456" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Duplicate field value entered");
    Ok(())
}

#[tokio::test]
async fn update_details_and_password() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let session = common::register(&app, "user").await?;

    let res = put(&app.router, "/auth/updatedetails", Some(&session.token), &json!({ "name": "Renamed" })).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["data"]["name"], "Renamed");
    assert_eq!(res.body["data"]["email"], session.email.as_str());

    let res = put(
        &app.router,
        "/auth/updatepassword",
        Some(&session.token),
        &json!({ "current_password": "bad-guess", "new_password": "1234567" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Password is incorrect");

    let res = put(
        &app.router,
        "/auth/updatepassword",
        Some(&session.token),
        &json!({ "current_password": "123456", "new_password": "1234567" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert!(res.body["token"].is_string());

    let res = post(&app.router, "/auth/login", None, &json!({ "email": session.email, "password": "1234567" })).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn forgot_and_reset_password() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let session = common::register(&app, "user").await?;

    let res = post(&app.router, "/auth/forgotpassword", None, &json!({ "email": "nobody@example.com" })).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "There is no user with that email");

    let res = post(&app.router, "/auth/forgotpassword", None, &json!({ "email": session.email })).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["data"], "Email sent");

    let plain = {
        let sent = app.mailer.sent.lock().unwrap();
        let message = sent.iter().rev().find(|m| m.to == session.email).expect("reset mail");
        let url = message.text.split_whitespace().last().expect("reset url");
        assert!(url.starts_with("http://localhost:5000/api/v1/auth/resetpassword/"), "url: {}", url);
        url.rsplit('/').next().expect("token").to_string()
    };

    let res = put(&app.router, "/auth/resetpassword/deadbeef", None, &json!({ "password": "abcdef" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Invalid token");

    let res = put(&app.router, &format!("/auth/resetpassword/{}", plain), None, &json!({ "password": "abcdef" })).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);

    // Tokens are single use
    let res = put(&app.router, &format!("/auth/resetpassword/{}", plain), None, &json!({ "password": "ghijkl" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = post(&app.router, "/auth/login", None, &json!({ "email": session.email, "password": "abcdef" })).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn failed_reset_mail_is_reported() -> Result<()> {
    let mailer = RecordingMailer { fail: true, ..Default::default() };
    let Some(app) = common::database_app_with(mailer).await? else { return Ok(()) };
    let session = common::register(&app, "user").await?;

    let res = post(&app.router, "/auth/forgotpassword", None, &json!({ "email": session.email })).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Email could not be sent");

    let token: Option<String> = sqlx::query_scalar("SELECT reset_password_token FROM accounts WHERE id = $1")
        .bind(session.id)
        .fetch_one(&app.pool)
        .await?;
    assert!(token.is_none());
    Ok(())
}

#[tokio::test]
async fn admin_password_update_is_always_hashed() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let admin = common::admin(&app).await?;
    let session = common::register(&app, "user").await?;

    let res = put(
        &app.router,
        &format!("/users/{}", session.id),
        Some(&admin.token),
        &json!({ "password": "$secret1" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);

    let stored: String = sqlx::query_scalar("SELECT password FROM accounts WHERE id = $1")
        .bind(session.id)
        .fetch_one(&app.pool)
        .await?;
    assert_ne!(stored, "$secret1");

    let res = post(&app.router, "/auth/login", None, &json!({ "email": session.email, "password": "$secret1" })).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);

    // Updating other fields leaves the hash alone
    let res = put(&app.router, &format!("/users/{}", session.id), Some(&admin.token), &json!({ "name": "Renamed" })).await?;
    assert_eq!(res.status, StatusCode::OK);
    let unchanged: String = sqlx::query_scalar("SELECT password FROM accounts WHERE id = $1")
        .bind(session.id)
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(unchanged, stored);
    Ok(())
}

#[tokio::test]
async fn standard_is_accepted_as_the_base_role() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let session = common::register(&app, "standard").await?;

    let res = get(&app.router, "/auth/me", Some(&session.token)).await?;
    assert_eq!(res.body["data"]["role"], "user");
    Ok(())
}
