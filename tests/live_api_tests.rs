//! Tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return() {
    let client = Client::new();
    let document_id = uuid::Uuid::new_v4().to_string();

    let user: Value = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "Bob", "document_id": document_id }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "Clean Code", "author": "Uncle Bob" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "user_id": user["id"], "book_id": book["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/loans/{}", BASE_URL, book["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let loan: Value = response.json().await.expect("Failed to parse response");
    assert!(loan["returned_date"].is_string());
    assert!(loan.get("fine").is_none());
}
