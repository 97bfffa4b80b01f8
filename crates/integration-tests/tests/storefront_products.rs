//! Integration tests for the product catalog API.

use metalworks_integration_tests::{TestServer, get_with_status, visitor_client};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = visitor_client()
        .get(server.url("/health"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_list_products() {
    let server = TestServer::start().await;
    let (status, products) = get_with_status(&visitor_client(), &server, "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().map(Vec::len), Some(10));
    assert_eq!(products[0]["id"], "gate-scroll-garden");
    assert_eq!(products[0]["price_display"], "$1450.00");
}

#[tokio::test]
async fn test_filter_by_category() {
    let server = TestServer::start().await;
    let (_, products) = get_with_status(&visitor_client(), &server, "/products?category=outdoor").await;

    let ids: Vec<&str> = products
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["fire-pit-hex", "planter-corten-tall"]);
}

#[tokio::test]
async fn test_categories() {
    let server = TestServer::start().await;
    let (_, categories) = get_with_status(&visitor_client(), &server, "/products/categories").await;

    assert_eq!(
        categories,
        serde_json::json!(["gates", "railings", "furniture", "outdoor", "sculpture", "signage"])
    );
}

#[tokio::test]
async fn test_product_detail_and_missing() {
    let server = TestServer::start().await;

    let (status, product) = get_with_status(&visitor_client(), &server, "/products/railing-stair-twist").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["price_display"], "$89.50");

    let (status, body) = get_with_status(&visitor_client(), &server, "/products/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
