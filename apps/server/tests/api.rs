//! End-to-end tests for the HTTP API against an in-memory database.

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use optic_db::{Database, DbConfig};
use optic_print::RenderOptions;
use optic_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt;

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, RenderOptions::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn create_product(app: &Router, name: &str, price: f64) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": name, "price": price })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()
}

fn scenario_a() -> Value {
    json!({
        "client_name": "Karim",
        "client_phone": "0555 12 34 56",
        "right_eye": { "sph": "-1.25", "cyl": "-0.50", "axe": "90" },
        "left_eye": { "sph": "-1.00", "cyl": "", "axe": "" },
        "products": [ { "name": "Frame", "price": 100, "quantity": 1, "total": 100 } ],
        "discount": 10,
        "numerical_discount": 5,
        "advance_payment": 20
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
    assert_eq!(body["migrations_applied"], body["migrations_total"]);
}

#[tokio::test]
async fn test_product_round_trip() {
    let app = app().await;

    let created = create_product(&app, "Aviator Frame", 120.5).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Aviator Frame");
    assert_eq!(created["price"].as_f64(), Some(120.5));

    let fetched = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["price"].as_f64(), Some(120.5));

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "name": "Aviator Frame Gold", "price": "135.00" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Aviator Frame Gold");
    assert_eq!(updated["price"].as_f64(), Some(135.0));

    let deleted = send(&app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["code"], "NOT_FOUND");
}

fn product_names(response: &TestResponse) -> Vec<String> {
    response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_products_listed_in_creation_order() {
    let app = app().await;
    create_product(&app, "Lens Cloth", 3.0).await;
    create_product(&app, "Hard Case", 9.0).await;
    create_product(&app, "Anti-glare Coating", 40.0).await;

    let response = send(&app, Method::GET, "/api/products", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        product_names(&response),
        vec!["Lens Cloth", "Hard Case", "Anti-glare Coating"]
    );
}

#[tokio::test]
async fn test_move_product() {
    let app = app().await;
    create_product(&app, "Frame", 100.0).await;
    create_product(&app, "Lens", 40.0).await;
    let case = create_product(&app, "Hard Case", 9.0).await;
    let uri = format!("/api/products/{}/move", case["id"].as_str().unwrap());

    let moved = send(&app, Method::POST, &uri, Some(json!({ "direction": "up" }))).await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(product_names(&moved), vec!["Frame", "Hard Case", "Lens"]);

    let listed = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(product_names(&listed), vec!["Frame", "Hard Case", "Lens"]);

    let down = send(&app, Method::POST, &uri, Some(json!({ "direction": "down" }))).await;
    let again = send(&app, Method::POST, &uri, Some(json!({ "direction": "down" }))).await;
    assert_eq!(down.status, StatusCode::OK);
    assert_eq!(product_names(&again), vec!["Frame", "Lens", "Hard Case"]);

    let sideways = send(&app, Method::POST, &uri, Some(json!({ "direction": "left" }))).await;
    assert_eq!(sideways.status, StatusCode::BAD_REQUEST);
    assert_eq!(sideways.json()["code"], "VALIDATION_ERROR");

    let missing = send(
        &app,
        Method::POST,
        "/api/products/abc/move",
        Some(json!({ "direction": "up" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_product_name_conflicts() {
    let app = app().await;
    create_product(&app, "Hard Case", 9.0).await;

    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "  Hard Case ", "price": 12 })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let body = response.json();
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["message"].as_str().unwrap().contains("Hard Case"));
}

#[tokio::test]
async fn test_product_validation() {
    let app = app().await;

    let blank = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "   ", "price": 10 })),
    )
    .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.json()["code"], "VALIDATION_ERROR");

    let negative = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Hard Case", "price": -1 })),
    )
    .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_keys_are_not_found() {
    let app = app().await;
    create_product(&app, "Hard Case", 9.0).await;

    // A product name is not its key
    let by_name = send(&app, Method::DELETE, "/api/products/Hard%20Case", None).await;
    assert_eq!(by_name.status, StatusCode::NOT_FOUND);
    assert_eq!(by_name.json()["code"], "NOT_FOUND");

    let update = send(
        &app,
        Method::PUT,
        "/api/products/abc",
        Some(json!({ "name": "Soft Case", "price": 5 })),
    )
    .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let product = send(&app, Method::GET, "/api/products/abc", None).await;
    assert_eq!(product.status, StatusCode::NOT_FOUND);

    for uri in ["/api/receipts/42", "/api/receipts/42/pdf"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
    }
    let delete = send(&app, Method::DELETE, "/api/receipts/42", None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.json()["code"], "NOT_FOUND");

    // The catalog is untouched
    let list = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(list.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/receipts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quote_scenario_a() {
    let app = app().await;

    let response = send(&app, Method::POST, "/api/receipts/quote", Some(scenario_a())).await;

    assert_eq!(response.status, StatusCode::OK);
    let totals = response.json()["totals"].clone();
    assert_eq!(totals["subtotal"].as_f64(), Some(100.0));
    assert_eq!(totals["percentage_discount"].as_f64(), Some(10.0));
    assert_eq!(totals["total"].as_f64(), Some(85.0));
    assert_eq!(totals["balance_due"].as_f64(), Some(65.0));
    assert_eq!(totals["credit"].as_f64(), Some(0.0));

    // Nothing is stored by a quote
    let list = send(&app, Method::GET, "/api/receipts", None).await;
    assert_eq!(list.json().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_quote_adds_assurance_tax_line() {
    let app = app().await;

    let response = send(
        &app,
        Method::POST,
        "/api/receipts/quote",
        Some(json!({
            "products": [ { "name": "Progressive Lens", "price": 200, "quantity": 2 } ],
            "assurance_tax_base": 150
        })),
    )
    .await;

    let body = response.json();
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1]["name"], "Assurance Tax");
    assert_eq!(products[1]["total"].as_f64(), Some(15.0));
    assert_eq!(body["totals"]["subtotal"].as_f64(), Some(415.0));
}

#[tokio::test]
async fn test_create_receipt_recomputes_totals() {
    let app = app().await;
    let mut draft = scenario_a();
    draft["total"] = json!(9999);
    draft["balance_due"] = json!(-3);

    let response = send(&app, Method::POST, "/api/receipts", Some(draft)).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let receipt = response.json();
    assert!(receipt["id"].as_str().is_some());
    assert!(receipt["created_at"].as_str().is_some());
    assert_eq!(receipt["total"].as_f64(), Some(85.0));
    assert_eq!(receipt["balance_due"].as_f64(), Some(65.0));
    assert_eq!(receipt["right_eye"]["sph"], "-1.25");

    let id = receipt["id"].as_str().unwrap();
    let fetched = send(&app, Method::GET, &format!("/api/receipts/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), receipt);
}

#[tokio::test]
async fn test_blank_client_gets_placeholders() {
    let app = app().await;

    let response = send(&app, Method::POST, "/api/receipts", Some(json!({}))).await;

    let receipt = response.json();
    assert_eq!(receipt["client_name"], "Walk-in Customer");
    assert_eq!(receipt["client_phone"], "N/A");
    assert_eq!(receipt["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_receipts_listed_newest_first() {
    let app = app().await;
    for (client, date) in [
        ("Older", "2024-01-05T10:00:00Z"),
        ("Newest", "2024-03-01 09:15:00"),
        ("Middle", "2024-02-10T16:30:00"),
    ] {
        let response = send(
            &app,
            Method::POST,
            "/api/receipts",
            Some(json!({ "client_name": client, "date": date })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = send(&app, Method::GET, "/api/receipts", None).await;

    let clients: Vec<String> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["client_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(clients, vec!["Newest", "Middle", "Older"]);
}

#[tokio::test]
async fn test_deleting_product_keeps_receipt_lines() {
    let app = app().await;
    let product = create_product(&app, "Blue Light Lens", 80.0).await;

    let receipt = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({
            "products": [ { "name": product["name"], "price": product["price"], "quantity": 2 } ]
        })),
    )
    .await
    .json();
    let receipt_id = receipt["id"].as_str().unwrap();

    let product_id = product["id"].as_str().unwrap();
    let deleted = send(&app, Method::DELETE, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let fetched = send(&app, Method::GET, &format!("/api/receipts/{receipt_id}"), None)
        .await
        .json();
    assert_eq!(fetched["products"], receipt["products"]);
    assert_eq!(fetched["products"][0]["name"], "Blue Light Lens");
    assert_eq!(fetched["total"].as_f64(), Some(160.0));
}

#[tokio::test]
async fn test_delete_receipt() {
    let app = app().await;
    let receipt = send(&app, Method::POST, "/api/receipts", Some(scenario_a()))
        .await
        .json();
    let uri = format!("/api/receipts/{}", receipt["id"].as_str().unwrap());

    assert_eq!(send(&app, Method::DELETE, &uri, None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, Method::GET, &uri, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_pdf_from_draft() {
    let app = app().await;
    let mut draft = scenario_a();
    draft["date"] = json!("2024-03-09T14:05:07Z");

    let response = send(&app, Method::POST, "/api/receipts/generate-pdf", Some(draft)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"receipt-20240309-140507.pdf\""
    );
    assert!(response.body.starts_with(b"%PDF"));

    // Nothing is stored by a preview
    let list = send(&app, Method::GET, "/api/receipts", None).await;
    assert_eq!(list.json().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_pdf_for_stored_receipt() {
    let app = app().await;
    let receipt = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({ "products": [ { "product": "Hard Case", "price": 9 } ] })),
    )
    .await
    .json();

    let response = send(
        &app,
        Method::GET,
        &format!("/api/receipts/{}/pdf", receipt["id"].as_str().unwrap()),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    assert!(response.body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_pdf_for_missing_receipt() {
    let app = app().await;

    let response = send(
        &app,
        Method::GET,
        "/api/receipts/3f1d7a4e-9c2b-4e8a-b6f0-2d5c1e7a9b31/pdf",
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["code"], "NOT_FOUND");
}
