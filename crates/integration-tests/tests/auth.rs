//! Integration tests for registration and login.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p shine-store-storefront)

use reqwest::StatusCode;
use serde_json::{Value, json};
use shine_store_integration_tests::{TestContext, unique_tag};

async fn post(ctx: &TestContext, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .post(ctx.url(path))
        .json(body)
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    (status, resp.json().await.expect("Response was not JSON"))
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_then_login() {
    let ctx = TestContext::new();
    let email = format!("{}@example.com", unique_tag("user"));

    let (status, body) = post(
        &ctx,
        "/register",
        &json!({"username": "ada", "email": email, "password": "hunter22"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));

    let (status, body) = post(&ctx, "/login", &json!({"email": email, "password": "hunter22"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].as_str().is_some());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_duplicate_registration_rejected() {
    let ctx = TestContext::new();
    let email = format!("{}@example.com", unique_tag("dup"));
    let form = json!({"username": "ada", "email": email, "password": "hunter22"});

    let (status, _) = post(&ctx, "/register", &form).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&ctx, "/register", &form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "User already exist!!!"}));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_failures_match() {
    let ctx = TestContext::new();
    let email = format!("{}@example.com", unique_tag("login"));
    post(
        &ctx,
        "/register",
        &json!({"username": "ada", "email": email, "password": "hunter22"}),
    )
    .await;

    let wrong_password = post(&ctx, "/login", &json!({"email": email, "password": "nope"})).await;
    let unknown_email = post(
        &ctx,
        "/login",
        &json!({"email": format!("{}@example.com", unique_tag("ghost")), "password": "hunter22"}),
    )
    .await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
}
