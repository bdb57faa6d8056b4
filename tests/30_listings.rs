mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use common::{create_listing, delete, get, post, put, unique};

#[tokio::test]
async fn malformed_id_is_not_found() -> Result<()> {
    let router = common::offline_app()?;

    let res = get(&router, "/listings/5d713995b721c3bb38c1f5d0", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Resource not found");
    Ok(())
}

#[tokio::test]
async fn publisher_creates_one_listing() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let publisher = common::register(&app, "publisher").await?;

    let name = unique("Devworks ");
    let res = post(&app.router, "/listings", Some(&publisher.token), &common::listing_body(&name)).await?;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    let listing = &res.body["data"];
    assert_eq!(listing["name"], name.as_str());
    assert_eq!(listing["slug"], name.to_lowercase().replace(' ', "-").as_str());
    assert_eq!(listing["photo"], "no-photo.jpg");
    assert_eq!(listing["account_id"], publisher.id.to_string().as_str());
    assert_eq!(listing["location"]["type"], "Point");
    assert!(listing.get("address").is_none());

    let res = post(&app.router, "/listings", Some(&publisher.token), &common::listing_body(&unique("Second "))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["error"],
        format!("The user with ID {} has already published a listing", publisher.id).as_str()
    );
    Ok(())
}

#[tokio::test]
async fn users_cannot_publish() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let user = common::register(&app, "user").await?;

    let res = post(&app.router, "/listings", Some(&user.token), &common::listing_body(&unique("Nope "))).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "User role user is unauthorized to access this route");
    Ok(())
}

#[tokio::test]
async fn invalid_listing_is_rejected() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let publisher = common::register(&app, "publisher").await?;

    let mut body = common::listing_body(&unique("Bad "));
    body["careers"] = json!(["Basket Weaving"]);
    body["website"] = json!("devworks.com");
    let res = post(&app.router, "/listings", Some(&publisher.token), &body).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["error"],
        "Please use a valid URL with HTTP or HTTPS, Basket Weaving is not a valid career"
    );
    Ok(())
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let owner = common::register(&app, "publisher").await?;
    let other = common::register(&app, "publisher").await?;
    let name = unique("Owned ");
    let id = create_listing(&app, &owner, &name).await?;

    let res = put(&app.router, &format!("/listings/{}", id), Some(&other.token), &json!({ "name": "Hijacked" })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(
        res.body["error"],
        format!("User {} is not authorized to update this listing", other.id).as_str()
    );

    let res = delete(&app.router, &format!("/listings/{}", id), Some(&other.token)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = get(&app.router, &format!("/listings/{}", id), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], name.as_str());
    Ok(())
}

#[tokio::test]
async fn owner_updates_and_admin_deletes() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let owner = common::register(&app, "publisher").await?;
    let admin = common::admin(&app).await?;
    let id = create_listing(&app, &owner, &unique("Before ")).await?;

    let renamed = unique("After Rename ");
    let res = put(
        &app.router,
        &format!("/listings/{}", id),
        Some(&owner.token),
        &json!({ "name": renamed, "job_guarantee": true, "average_cost": 1 }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["data"]["name"], renamed.as_str());
    assert_eq!(res.body["data"]["slug"], renamed.to_lowercase().replace(' ', "-").as_str());
    assert_eq!(res.body["data"]["job_guarantee"], true);
    assert_eq!(res.body["data"]["housing"], true);
    assert!(res.body["data"]["average_cost"].is_null());

    let res = delete(&app.router, &format!("/listings/{}", id), Some(&admin.token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!({}));

    let res = get(&app.router, &format!("/listings/{}", id), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], format!("No listing with the id of {}", id).as_str());
    Ok(())
}

#[tokio::test]
async fn radius_search_finds_nearby_listing() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let publisher = common::register(&app, "publisher").await?;
    let id = create_listing(&app, &publisher, &unique("Nearby ")).await?;

    let res = get(&app.router, "/listings/radius/02215/10", None).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    let ids: Vec<&str> = res.body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|l| l["id"].as_str()).collect())
        .unwrap_or_default();
    assert!(ids.contains(&id.as_str()), "listing {} not in {:?}", id, ids);
    assert_eq!(res.body["count"].as_u64(), Some(ids.len() as u64));

    let res = get(&app.router, "/listings/radius/02215/far", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

fn multipart_request(path: &str, token: &str, content_type: &str, file_name: &str, bytes: &[u8]) -> Result<Request<Body>> {
    let boundary = "devcamper-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Ok(Request::builder()
        .method(Method::PUT)
        .uri(format!("{}{}", common::PREFIX, path))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))?)
}

#[tokio::test]
async fn photo_upload_is_validated_and_stored() -> Result<()> {
    let Some(app) = common::database_app().await? else { return Ok(()) };
    let publisher = common::register(&app, "publisher").await?;
    let id = create_listing(&app, &publisher, &unique("Photo ")).await?;
    let path = format!("/listings/{}/photo", id);

    let res = common::send(&app.router, multipart_request(&path, &publisher.token, "text/plain", "notes.txt", b"hi")?).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Please upload an image file");

    let oversized = vec![0u8; 1_001];
    let res = common::send(&app.router, multipart_request(&path, &publisher.token, "image/jpeg", "big.jpg", &oversized)?).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Please upload an image less than 1000 bytes");

    let res = common::send(&app.router, multipart_request(&path, &publisher.token, "image/jpeg", "campus.jpg", &[0xFF, 0xD8, 0xFF])?).await?;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    let stored = format!("photo_{}.jpg", id);
    assert_eq!(res.body["data"], stored.as_str());
    assert!(app.upload_dir.path().join(&stored).exists());

    let res = get(&app.router, &format!("/listings/{}", id), None).await?;
    assert_eq!(res.body["data"]["photo"], stored.as_str());
    Ok(())
}
