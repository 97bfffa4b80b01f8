//! Metalworks storefront library.
//!
//! The cart store and its persistence live here alongside the HTTP service
//! built on them, so the CLI and integration tests can reuse both.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes::routes()
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use metalworks_core::CurrencyCode;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::Catalog;
    use crate::config::StorefrontConfig;
    use crate::middleware::request_id::REQUEST_ID_HEADER;
    use crate::storage::MemoryStorage;

    fn test_app() -> Router {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_BASE_URL").then(|| "http://localhost:3000".to_string())
        })
        .unwrap();
        let catalog =
            Catalog::from_json(include_str!("../catalog/products.json"), CurrencyCode::USD)
                .unwrap();
        app(AppState::new(config, catalog, Arc::new(MemoryStorage::new())))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let response = test_app()
            .oneshot(post_json("/cart/add", r#"{"product_id":"no-such-thing"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_sets_session_cookie() {
        let response = test_app()
            .oneshot(post_json(
                "/cart/add",
                r#"{"product_id":"gate-scroll-garden","quantity":2}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let cart: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(cart["item_count"], 2);
    }

    #[tokio::test]
    async fn test_zero_quantity_add_is_bad_request() {
        let response = test_app()
            .oneshot(post_json(
                "/cart/add",
                r#"{"product_id":"gate-scroll-garden","quantity":0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
