//! Integration tests for the API server.

use std::sync::OnceLock;

use api::AppCatalog;
use api::config::Config;
use api::error::StartupError;
use axum::Router;
use axum::body::Body;
use axum::extract::Path;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use cart::notification::{ADD_FAILED, AMOUNT_CHANGE_FAILED, REMOVE_FAILED, STOCK_EXCEEDED};
use cart::{CartState, DEFAULT_STORAGE_KEY, InMemoryCartStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup_with_catalog(catalog: AppCatalog, store: InMemoryCartStore) -> Router {
    let state = api::create_state(catalog, store, DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    api::create_app(state, get_metrics_handle())
}

async fn setup_with_store(store: InMemoryCartStore) -> Router {
    let catalog = AppCatalog::from_fixture(None).unwrap();
    setup_with_catalog(catalog, store).await
}

async fn setup() -> Router {
    setup_with_store(InMemoryCartStore::new()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn add(app: &Router, product_id: u64) -> (StatusCode, Value) {
    send(app, "POST", "/cart/items", Some(json!({ "product_id": product_id }))).await
}

async fn set_amount(app: &Router, product_id: u64, amount: i64) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/cart/items/{product_id}"),
        Some(json!({ "amount": amount })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["catalog"], "fixture");
    assert_eq!(json["catalog_products"], 6);
    assert_eq!(json["cart_items"], 0);
}

#[tokio::test]
async fn test_empty_cart() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"], json!([]));
    assert_eq!(json["item_count"], 0);
    assert_eq!(json["subtotal"], 0);
    assert_eq!(json["formatted_subtotal"], "$0.00");
}

#[tokio::test]
async fn test_add_item() {
    let store = InMemoryCartStore::new();
    let app = setup_with_store(store.clone()).await;

    let (status, json) = add(&app, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["item_count"], 1);
    assert_eq!(json["items"][0]["id"], 1);
    assert_eq!(json["items"][0]["price"], 17990);
    assert_eq!(json["items"][0]["amount"], 1);

    let persisted = store.get(DEFAULT_STORAGE_KEY).await.unwrap();
    let cart = CartState::from_json(&persisted).unwrap();
    assert_eq!(cart.len(), 1);
}

#[tokio::test]
async fn test_add_twice_increments() {
    let app = setup().await;

    add(&app, 2).await;
    let (status, json) = add(&app, 2).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["item_count"], 1);
    assert_eq!(json["total_units"], 2);
}

#[tokio::test]
async fn test_cart_prices_are_formatted() {
    let app = setup().await;

    add(&app, 1).await;
    add(&app, 1).await;
    let (_, json) = add(&app, 2).await;

    let item = &json["items"][0];
    assert_eq!(item["price"], 17990);
    assert_eq!(item["formatted_price"], "$179.90");
    assert_eq!(item["formatted_subtotal"], "$359.80");
    assert_eq!(json["subtotal"], 2 * 17990 + 13990);
    assert_eq!(json["formatted_subtotal"], "$499.70");
}

#[tokio::test]
async fn test_add_beyond_stock() {
    let app = setup().await;

    // product 4 has a single unit in the demo catalog
    let (status, _) = add(&app, 4).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = add(&app, 4).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], STOCK_EXCEEDED);

    let (_, cart) = send(&app, "GET", "/cart", None).await;
    assert_eq!(cart["items"][0]["amount"], 1);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = setup().await;

    let (status, json) = add(&app, 99).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], ADD_FAILED);
}

#[tokio::test]
async fn test_set_amount() {
    let app = setup().await;
    add(&app, 2).await;

    let (status, json) = set_amount(&app, 2, 4).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["amount"], 4);
}

#[tokio::test]
async fn test_set_amount_rejections() {
    let app = setup().await;
    add(&app, 2).await;

    let (status, json) = set_amount(&app, 2, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], AMOUNT_CHANGE_FAILED);

    let (status, json) = set_amount(&app, 2, 6).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], AMOUNT_CHANGE_FAILED);

    let (status, json) = set_amount(&app, 3, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], AMOUNT_CHANGE_FAILED);

    let (_, cart) = send(&app, "GET", "/cart", None).await;
    assert_eq!(cart["items"][0]["amount"], 1);
}

#[tokio::test]
async fn test_remove_item() {
    let app = setup().await;
    add(&app, 1).await;
    add(&app, 2).await;

    let (status, json) = send(&app, "DELETE", "/cart/items/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["item_count"], 1);
    assert_eq!(json["items"][0]["id"], 2);

    let (status, json) = send(&app, "DELETE", "/cart/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], REMOVE_FAILED);
}

#[tokio::test]
async fn test_invalid_product_id_format() {
    let app = setup().await;

    let (status, json) = send(&app, "DELETE", "/cart/items/not-a-number", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not-a-number"));
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let store = InMemoryCartStore::new();
    let app = setup_with_store(store.clone()).await;
    add(&app, 5).await;
    add(&app, 1).await;
    drop(app);

    let app = setup_with_store(store).await;
    let (_, cart) = send(&app, "GET", "/cart", None).await;

    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["items"][0]["id"], 5);
    assert_eq!(cart["items"][1]["id"], 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;
    add(&app, 1).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("cart_mutations_total"));
}

// -- Remote catalog --

async fn remote_stock(Path(id): Path<u64>) -> Response {
    match id {
        1 => axum::Json(json!({ "id": 1, "amount": 2 })).into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn remote_product(Path(id): Path<u64>) -> Response {
    match id {
        1 => axum::Json(json!({
            "id": 1,
            "title": "Trail runner",
            "price": 24990,
            "image": "https://cdn.example.com/trail.jpg"
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_remote_catalog() -> String {
    let app = Router::new()
        .route("/stock/{id}", get(remote_stock))
        .route("/products/{id}", get(remote_product));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_remote_catalog() {
    let config = Config {
        catalog_url: Some(spawn_remote_catalog().await),
        ..Config::default()
    };
    let catalog = AppCatalog::from_config(&config).unwrap();
    let app = setup_with_catalog(catalog, InMemoryCartStore::new()).await;

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["catalog"], "remote");
    assert_eq!(health["catalog_products"], Value::Null);

    let (status, json) = add(&app, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["title"], "Trail runner");

    add(&app, 1).await;
    let (status, json) = add(&app, 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], STOCK_EXCEEDED);

    // the catalog answers 503 for every other product
    let (status, json) = add(&app, 2).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], ADD_FAILED);
}

#[tokio::test]
async fn test_unreadable_store_fails_startup() {
    let store = InMemoryCartStore::new();
    store.set_fail_on_read(true);
    let catalog = AppCatalog::from_fixture(None).unwrap();

    let result = api::create_state(catalog, store, DEFAULT_STORAGE_KEY).await;

    assert!(matches!(result, Err(StartupError::Cart(_))));
}
