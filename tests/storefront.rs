//! HTTP-level tests against the bundled catalog with an in-memory cart.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use hd_storefront::api::{router, AppState};
use hd_storefront::storage::{FileStorage, MemoryStorage};
use hd_storefront::{Catalog, StorefrontConfig};

fn app() -> Router {
    router(AppState::new(Catalog::builtin().unwrap(), MemoryStorage::new(), StorefrontConfig::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) { send(app, Method::GET, uri, None).await }

fn ids(products: &Value) -> Vec<String> {
    products.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap().to_string()).collect()
}

fn checkout_body(locale: &str) -> Value {
    json!({
        "locale": locale,
        "fullName": "Ahmed Ali",
        "phone": "01012345678",
        "center": "assiut",
        "addressDetails": "12 Gomhoria Street, 3rd floor",
        "landmark": "Near the mosque"
    })
}

#[tokio::test]
async fn health_check() {
    let (status, body) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn first_page_of_full_catalog() {
    let (status, body) = get(&app(), "/api/v1/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 24);
    assert_eq!(body["products"].as_array().unwrap().len(), 12);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["active_filters"], 0);
}

#[tokio::test]
async fn load_more_keeps_earlier_results() {
    let app = app();
    let (_, first) = get(&app, "/api/v1/products").await;
    let (_, second) = get(&app, "/api/v1/products?page=2").await;
    let first = ids(&first["products"]);
    let second_ids = ids(&second["products"]);
    assert_eq!(second_ids.len(), 24);
    assert_eq!(&second_ids[..12], first.as_slice());
    assert_eq!(second["has_more"], false);
}

#[tokio::test]
async fn brand_and_stock_filters_with_price_sort() {
    let (status, body) = get(&app(), "/api/v1/products?brand=Dell&in_stock=true&sort=priceLow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 9);
    assert_eq!(body["active_filters"], 2);
    let products = ids(&body["products"]);
    assert_eq!(products.first().map(String::as_str), Some("9"));
    assert!(!products.contains(&"19".to_string()));
}

#[tokio::test]
async fn price_high_sort_and_price_bounds() {
    let app = app();
    let (_, body) = get(&app, "/api/v1/products?sort=priceHigh").await;
    assert_eq!(ids(&body["products"]).first().map(String::as_str), Some("7"));

    let (_, body) = get(&app, "/api/v1/products?price_min=7000&price_max=9000").await;
    let mut found = ids(&body["products"]);
    found.sort();
    assert_eq!(found, vec!["12", "16", "24"]);
}

#[tokio::test]
async fn dedicated_gpu_filter() {
    let (_, body) = get(&app(), "/api/v1/products?gpu=true").await;
    assert_eq!(ids(&body["products"]), vec!["3", "7", "11", "13", "18", "20", "23"]);
}

#[tokio::test]
async fn multi_value_filters_are_comma_separated() {
    let (_, body) = get(&app(), "/api/v1/products?cpu=Ryzen%205,Ryzen%207&keyboard=ar-en,EN").await;
    assert_eq!(ids(&body["products"]), vec!["18", "20", "23"]);
    assert_eq!(body["active_filters"], 4);
}

#[tokio::test]
async fn search_page() {
    let app = app();
    let (_, body) = get(&app, "/api/v1/search?q=").await;
    assert_eq!(body["count"], 0);

    let (_, body) = get(&app, "/api/v1/search?q=NVIDIA").await;
    assert_eq!(ids(&body["results"]), vec!["3", "7", "11", "13"]);

    let (_, body) = get(&app, "/api/v1/search?q=%D8%AF%D9%8A%D9%84&locale=ar").await;
    assert!(body["count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn autosuggest_threshold_and_cap() {
    let app = app();
    let (_, body) = get(&app, "/api/v1/search/suggest?q=d").await;
    assert_eq!(body, json!([]));

    let (_, body) = get(&app, "/api/v1/search/suggest?q=dell").await;
    let suggestions = body.as_array().unwrap();
    assert_eq!(suggestions.len(), 5);
    assert!(suggestions.iter().all(|s| s["brand"] == "Dell"));
}

#[tokio::test]
async fn product_detail_and_related() {
    let app = app();
    let (status, body) = get(&app, "/api/v1/products/dell-latitude-5520-i7-11th").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["id"], "1");
    let related = ids(&body["related"]);
    assert_eq!(related.len(), 4);
    assert!(!related.contains(&"1".to_string()));

    let (status, _) = get(&app, "/api/v1/products/macbook-pro").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn offers_sections() {
    let (_, body) = get(&app(), "/api/v1/offers").await;
    assert_eq!(ids(&body["hot_deals"]), vec!["1", "3", "7", "10", "11", "20"]);
    assert_eq!(ids(&body["best_sellers"]), vec!["1", "2", "5", "10", "13", "17"]);
    assert_eq!(ids(&body["limited_stock"]), vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn cart_add_update_remove() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "1"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item_count"], 1);
    assert_eq!(body["persistent"], true);

    let (_, body) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "1"}))).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["item_count"], 2);
    assert_eq!(body["total"].as_f64(), Some(29000.0));

    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "24"}))).await;
    let (_, body) = send(&app, Method::PUT, "/api/v1/cart/items/24", Some(json!({"quantity": 3}))).await;
    assert_eq!(body["item_count"], 5);
    assert_eq!(body["total"].as_f64(), Some(50000.0));

    let (_, body) = send(&app, Method::PUT, "/api/v1/cart/items/1", Some(json!({"quantity": 0}))).await;
    assert_eq!(ids(&body["items"].as_array().unwrap().iter().map(|l| l["product"].clone()).collect::<Value>()), vec!["24"]);

    let (_, body) = send(&app, Method::DELETE, "/api/v1/cart/items/24", None).await;
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn cart_rejects_unknown_product() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "999"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = get(&app, "/api/v1/cart").await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn clear_cart() {
    let app = app();
    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "2"}))).await;
    let (status, _) = send(&app, Method::DELETE, "/api/v1/cart", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get(&app, "/api/v1/cart").await;
    assert_eq!(body["item_count"], 0);
}

#[tokio::test]
async fn checkout_requires_items_and_valid_details() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/v1/checkout", Some(checkout_body("en"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "4"}))).await;
    let mut invalid = checkout_body("en");
    invalid["phone"] = json!("0101234");
    let (status, _) = send(&app, Method::POST, "/api/v1/checkout", Some(invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = get(&app, "/api/v1/cart").await;
    assert_eq!(body["item_count"], 1);
}

#[tokio::test]
async fn checkout_produces_whatsapp_link_and_clears_cart() {
    let app = app();
    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "4"}))).await;
    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "4"}))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/checkout", Some(checkout_body("ar"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item_count"], 2);
    assert_eq!(body["total"].as_f64(), Some(21000.0));
    assert!(body["whatsapp_link"].as_str().unwrap().starts_with("https://wa.me/201066537666?text="));
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Ahmed Ali"));
    assert!(message.contains("الدفع عند الاستلام"));

    let (_, body) = get(&app, "/api/v1/cart").await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn cart_survives_restart_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let file_app = || router(AppState::new(Catalog::builtin().unwrap(), FileStorage::new(dir.path()), StorefrontConfig::default()));

    let app = file_app();
    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "3"}))).await;
    send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"product_id": "12"}))).await;
    send(&app, Method::PUT, "/api/v1/cart/items/3", Some(json!({"quantity": 2}))).await;
    drop(app);

    let (_, body) = get(&file_app(), "/api/v1/cart").await;
    assert_eq!(body["item_count"], 3);
    assert_eq!(body["total"].as_f64(), Some(42000.0));
    assert_eq!(body["items"][0]["product"]["priceEGP"].as_f64(), Some(16500.0));
}
