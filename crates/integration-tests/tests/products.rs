//! Product pages and JSON endpoints against a mocked catalog API.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use vitrina_integration_tests::{TestContext, product_json};

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let health = ctx.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, "ok");

    let ready = ctx.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert!(ready.headers.contains_key("x-request-id"));
    assert_eq!(ready.headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_list_page_renders_products() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .catalog
        .mock("GET", "/products")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([product_json(7, "Oak Chair")]).to_string())
        .create_async()
        .await;

    let response = ctx.get("/products/products/").await;
    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Oak Chair"));
    assert!(response.body.contains("$19.99"));
    assert!(response.body.contains("/products/products/7/editar/"));
}

#[tokio::test]
async fn test_list_page_shows_upstream_failure() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("GET", "/products")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let page = ctx.get("/products/products/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Catalog service error: 500"));

    let api = ctx.get("/products/api/products/").await;
    assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(api.json()["success"], false);
}

#[tokio::test]
async fn test_create_product_end_to_end() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .catalog
        .mock("POST", "/products/")
        .match_body(mockito::Matcher::PartialJson(json!({
            "title": "Oak Chair",
            "price": 19.99,
            "categoryId": 1,
            "images": ["https://img.example/p.png"]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(product_json(42, "Oak Chair").to_string())
        .create_async()
        .await;

    let response = ctx
        .post_json(
            "/products/crear/",
            &json!({
                "nombre": "Oak Chair",
                "precio": "19.99",
                "descripcion": "A sturdy product",
                "categoriaId": "1",
                "imagen": "https://img.example/p.png"
            }),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 42);
    assert_eq!(body["data"]["title"], "Oak Chair");
    assert_eq!(body["data"]["creationAt"], "2023-01-03T15:58:58.000Z");
    assert_eq!(body["data"]["category"]["slug"], "furniture");
}

#[tokio::test]
async fn test_create_product_validation_sends_nothing() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .catalog
        .mock("POST", "/products/")
        .expect(0)
        .create_async()
        .await;

    let response = ctx
        .post_json(
            "/products/api/crear/",
            &json!({"nombre": "Oak Chair", "precio": "cheap"}),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_create_product_upstream_rejection() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("POST", "/products/")
        .with_status(400)
        .with_body(r#"{"message":["price must be a positive number"]}"#)
        .create_async()
        .await;

    let response = ctx
        .post_json(
            "/products/api/crear/",
            &json!({
                "title": "Oak Chair",
                "price": 19.99,
                "description": "A sturdy product",
                "categoryId": 1,
                "image": "https://img.example/p.png"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("400"));
}

#[tokio::test]
async fn test_update_product() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .catalog
        .mock("PUT", "/products/7")
        .match_body(mockito::Matcher::PartialJson(json!({"title": "Walnut Chair"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(product_json(7, "Walnut Chair").to_string())
        .create_async()
        .await;

    let response = ctx
        .send_json(
            Method::PUT,
            "/products/api/products/7/editar/",
            &json!({
                "title": "Walnut Chair",
                "price": "25",
                "description": "Darker wood",
                "images": ["https://img.example/p.png"]
            }),
            None,
        )
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["data"]["title"], "Walnut Chair");
    assert_eq!(body["data"]["updatedAt"], "2023-01-03T15:58:58.000Z");
}

#[tokio::test]
async fn test_update_with_empty_images_keeps_catalog_images() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .catalog
        .mock("PUT", "/products/42")
        .match_body(mockito::Matcher::Json(json!({
            "title": "Chair",
            "price": 25.0,
            "description": "Oak"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(product_json(42, "Chair").to_string())
        .create_async()
        .await;

    let response = ctx
        .send_json(
            Method::PUT,
            "/products/api/products/42/editar/",
            &json!({
                "title": "Chair",
                "price": "25",
                "description": "Oak",
                "images": []
            }),
            None,
        )
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["images"], json!(["https://img.example/p.png"]));
}

#[tokio::test]
async fn test_delete_failure_flashes_on_next_page() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("DELETE", "/products/5")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;
    ctx.catalog
        .mock("GET", "/products")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let deleted = ctx
        .send(
            axum::http::Request::post("/products/products/5/eliminar/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert_eq!(deleted.location(), "/products/products/");
    let cookie = deleted.session_cookie().unwrap();

    let list = ctx.get_with_cookie("/products/products/", &cookie).await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("There was a problem deleting the product"));

    // Shown once, then gone
    let again = ctx.get_with_cookie("/products/products/", &cookie).await;
    assert!(!again.body.contains("There was a problem deleting the product"));
}

#[tokio::test]
async fn test_delete_success_flash() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("DELETE", "/products/5")
        .with_status(200)
        .with_body("true")
        .create_async()
        .await;
    ctx.catalog
        .mock("GET", "/products")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let deleted = ctx
        .send(
            axum::http::Request::post("/products/products/5/eliminar/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    let cookie = deleted.session_cookie().unwrap();

    let list = ctx.get_with_cookie("/products/products/", &cookie).await;
    assert!(list.body.contains("Product deleted successfully."));
}

#[tokio::test]
async fn test_edit_form_missing_product_redirects() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("GET", "/products/999")
        .with_status(400)
        .with_body(r#"{"message":"Could not find any entity"}"#)
        .create_async()
        .await;

    let response = ctx.get("/products/products/999/editar/").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/products/products/");
    assert!(response.session_cookie().is_some());
}

#[tokio::test]
async fn test_edit_form_and_pay_screen_render() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("GET", "/products/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(product_json(7, "Oak Chair").to_string())
        .expect(2)
        .create_async()
        .await;

    let edit = ctx.get("/products/products/7/editar/").await;
    assert_eq!(edit.status, StatusCode::OK);
    assert!(edit.body.contains("value=\"Oak Chair\""));

    let pay = ctx.get("/products/pagar/7/").await;
    assert_eq!(pay.status, StatusCode::OK);
    assert!(pay.body.contains("Checkout"));
}

#[tokio::test]
async fn test_create_form_warns_when_categories_fail() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("GET", "/categories")
        .with_status(503)
        .create_async()
        .await;

    let response = ctx.get("/products/crear/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("flash-warning"));
    assert!(response.body.contains("Could not load categories"));
}

#[tokio::test]
async fn test_create_form_lists_categories() {
    let mut ctx = TestContext::new().await;
    ctx.catalog
        .mock("GET", "/categories")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": 1, "name": "Furniture", "slug": "furniture", "image": "https://img.example/c.png"},
                {"id": 2, "name": "Shoes", "slug": "shoes", "image": "https://img.example/s.png"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let response = ctx.get("/products/crear/").await;
    assert!(response.body.contains("<option value=\"2\">Shoes</option>"));
    assert!(!response.body.contains("flash-warning"));
}

#[tokio::test]
async fn test_root_redirects_to_home() {
    let ctx = TestContext::new().await;

    let root = ctx.get("/").await;
    assert_eq!(root.status, StatusCode::SEE_OTHER);
    assert_eq!(root.location(), "/products/");

    let home = ctx.get("/products/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Welcome to Vitrina"));
}
