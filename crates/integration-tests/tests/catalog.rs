//! Integration tests for the product catalog.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p shine-store-storefront)

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use shine_store_integration_tests::{TestContext, unique_tag};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_root_banner() {
    let ctx = TestContext::new();

    let resp = ctx.client.get(ctx.url("/")).send().await.expect("Failed to get /");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Shine Store Server is Running");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_readiness() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Failed to get readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_crud_round_trip() {
    let ctx = TestContext::new();
    let product = json!({"name": "Glow Serum", "category": unique_tag("crud"), "price": 24.5});

    let id = ctx.create_product(&product).await;
    let url = ctx.url(&format!("/products/{id}"));

    let fetched: Value = ctx.client.get(&url).send().await.unwrap().json().await.unwrap();
    let mut expected = product.clone();
    expected["_id"] = json!(id);
    assert_eq!(fetched, expected);

    let ack: Value = ctx
        .client
        .put(&url)
        .json(&json!({"price": 19.0}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack["matchedCount"], json!(1));
    assert_eq!(ack["modifiedCount"], json!(1));

    let ack: Value = ctx.client.delete(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(ack["deletedCount"], json!(1));

    let resp = ctx.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await.unwrap(), Value::Null);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_search_by_category_and_price() {
    let ctx = TestContext::new();
    let category = unique_tag("search");

    let mut ids = Vec::new();
    for (name, price) in [("cheap", 5), ("mid", 15), ("pricey", 50)] {
        ids.push(
            ctx.create_product(&json!({"name": name, "category": category, "price": price}))
                .await,
        );
    }

    let found: Value = ctx
        .client
        .get(ctx.url(&format!("/products?category={category}&priceLow=10&priceHigh=20")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<_> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["mid"]);

    for id in &ids {
        ctx.delete_product(id).await;
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_search_without_filters_is_empty() {
    let ctx = TestContext::new();

    let found: Value = ctx
        .client
        .get(ctx.url("/products?priceLow=abc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found, json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_trending_is_capped_and_sorted() {
    let ctx = TestContext::new();

    let trending: Value = ctx
        .client
        .get(ctx.url("/trending-products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ratings: Vec<f64> = trending
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["ratings"].as_f64())
        .collect();
    assert!(trending.as_array().unwrap().len() <= 6);
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
}
