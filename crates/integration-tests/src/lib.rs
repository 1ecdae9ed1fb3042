//! Integration tests for Vitrina.
//!
//! Each test drives the full storefront router in-process. The catalog API
//! is a `mockito` server and accounts live in the in-memory user store, so
//! no database or network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `accounts` - Registration, login, token and logout flows
//! - `products` - Catalog pages and JSON endpoints against a mocked API

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use vitrina_storefront::config::{CatalogConfig, StorefrontConfig};
use vitrina_storefront::db::MemoryUserStore;
use vitrina_storefront::state::AppState;

/// Client address reported to the rate limiter.
const TEST_CLIENT_IP: &str = "192.0.2.10";

/// A response with its body read to completion.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// The `Location` header of a redirect.
    pub fn location(&self) -> &str {
        self.headers[header::LOCATION].to_str().unwrap()
    }

    /// The `name=value` part of the session cookie, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("vitrina_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

/// The storefront router wired to a mocked catalog API.
pub struct TestContext {
    pub catalog: mockito::ServerGuard,
    pub users: Arc<MemoryUserStore>,
    app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let catalog = mockito::Server::new_async().await;
        let users = Arc::new(MemoryUserStore::new());

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            database_url: None,
            catalog: CatalogConfig {
                base_url: catalog.url(),
                timeout: Duration::from_secs(5),
            },
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config, users.clone()).unwrap();
        let app = vitrina_storefront::build_router(state);

        Self {
            catalog,
            users,
            app,
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, mut request: Request<Body>) -> TestResponse {
        request
            .headers_mut()
            .insert("x-forwarded-for", TEST_CLIENT_IP.parse().unwrap());

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET with a session cookie from an earlier response.
    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Send a JSON body, optionally with a bearer token.
    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: &Value,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send_json(Method::POST, uri, body, None).await
    }

    /// Send a request with no body and a bearer token.
    pub async fn with_token(&self, method: Method, uri: &str, token: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Token {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// A complete product as the catalog API returns it.
pub fn product_json(id: i64, title: &str) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "price": 19.99,
        "description": "A sturdy product",
        "category": {
            "id": 1,
            "name": "Furniture",
            "slug": "furniture",
            "image": "https://img.example/cat.png"
        },
        "images": ["https://img.example/p.png"],
        "creationAt": "2023-01-03T15:58:58.000Z",
        "updatedAt": "2023-01-03T15:58:58.000Z"
    })
}
