//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

fn day_offset(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

/// Register a fresh user with the given role and return (user_id, token)
async fn register_user(client: &Client, role: &str) -> (i64, String) {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": unique(role),
            "password": "testpass123",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let user_id = body["user"]["id"].as_i64().expect("No user id in response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (user_id, token)
}

/// Create an equipment item as admin and return its id
async fn create_equipment(client: &Client, admin_token: &str, quantity: i32) -> i64 {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "name": unique("camera"),
            "category": "camera",
            "condition": "good",
            "quantity": quantity,
            "available_quantity": quantity
        }))
        .send()
        .await
        .expect("Failed to send create equipment request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse equipment response");
    body["id"].as_i64().expect("No equipment id")
}

/// Create a borrow request and return the raw response
async fn create_request(
    client: &Client,
    token: &str,
    equipment_id: i64,
    quantity: i32,
    from_days: i64,
    to_days: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/borrow-requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "equipment_id": equipment_id,
            "quantity": quantity,
            "borrow_from": day_offset(from_days),
            "borrow_to": day_offset(to_days),
            "purpose": "Integration test"
        }))
        .send()
        .await
        .expect("Failed to send create request")
}

async fn get_equipment(client: &Client, token: &str, id: i64) -> Value {
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send get equipment request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse equipment")
}

async fn transition(client: &Client, token: &str, request_id: i64, action: &str) -> reqwest::Response {
    client
        .post(format!("{}/borrow-requests/{}/{}", BASE_URL, request_id, action))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send transition request")
}

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
async fn test_register_and_login() {
    let client = Client::new();
    let username = unique("student");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    // Role defaults to student
    assert_eq!(body["user"]["role"], "student");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let username = unique("student");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_full_lifecycle_restores_stock() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, staff_token) = register_user(&client, "staff").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    // Availability check before anything is committed
    let response = client
        .get(format!(
            "{}/equipment/{}/availability?from={}&to={}&quantity=2",
            BASE_URL,
            equipment_id,
            day_offset(1),
            day_offset(3)
        ))
        .header("Authorization", format!("Bearer {}", student_token))
        .send()
        .await
        .expect("Failed to send availability request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse availability");
    assert_eq!(body["admissible"], true);
    assert_eq!(body["remaining"], 5);

    // Create -> pending
    let response = create_request(&client, &student_token, equipment_id, 2, 1, 3).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().expect("No request id");
    assert_eq!(body["status"], "pending");

    // Approve -> approved, no counter change
    let response = transition(&client, &staff_token, request_id, "approve").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse approve");
    assert_eq!(body["status"], "approved");
    let equipment = get_equipment(&client, &student_token, equipment_id).await;
    assert_eq!(equipment["available_quantity"], 5);

    // Issue -> issued, counter decremented
    let response = transition(&client, &staff_token, request_id, "issue").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse issue");
    assert_eq!(body["status"], "issued");
    let equipment = get_equipment(&client, &student_token, equipment_id).await;
    assert_eq!(equipment["available_quantity"], 3);

    // Return -> returned, counter restored
    let response = transition(&client, &staff_token, request_id, "return").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse return");
    assert_eq!(body["status"], "returned");
    let equipment = get_equipment(&client, &student_token, equipment_id).await;
    assert_eq!(equipment["available_quantity"], 5);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_approval_fails_with_remaining() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, staff_token) = register_user(&client, "staff").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    // Two overlapping requests while both are pending: creation succeeds
    // because pending requests hold no capacity
    let response = create_request(&client, &student_token, equipment_id, 3, 1, 5).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse request");
    let first_id = body["id"].as_i64().unwrap();

    let response = create_request(&client, &student_token, equipment_id, 3, 2, 4).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse request");
    let second_id = body["id"].as_i64().unwrap();

    // First approval takes 3 of 5 units for the period
    let response = transition(&client, &staff_token, first_id, "approve").await;
    assert!(response.status().is_success());

    // Second approval would need 3 more with only 2 left
    let response = transition(&client, &staff_token, second_id, "approve").await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "OverlapExceedsStock");
    assert_eq!(body["remaining"], 2);
}

#[tokio::test]
#[ignore]
async fn test_issue_pending_request_fails() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, staff_token) = register_user(&client, "staff").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    let response = create_request(&client, &student_token, equipment_id, 2, 1, 3).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().unwrap();

    // pending -> issued skips approval
    let response = transition(&client, &staff_token, request_id, "issue").await;
    assert_eq!(response.status(), 422);

    // Counter untouched
    let equipment = get_equipment(&client, &student_token, equipment_id).await;
    assert_eq!(equipment["available_quantity"], 5);
}

#[tokio::test]
#[ignore]
async fn test_approve_twice_fails() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, staff_token) = register_user(&client, "staff").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    let response = create_request(&client, &student_token, equipment_id, 1, 1, 2).await;
    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().unwrap();

    let response = transition(&client, &staff_token, request_id, "approve").await;
    assert!(response.status().is_success());

    let response = transition(&client, &staff_token, request_id, "approve").await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_inverted_interval_rejected() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    // borrow_to before borrow_from
    let response = create_request(&client, &student_token, equipment_id, 1, 5, 2).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "InvalidInterval");
}

#[tokio::test]
#[ignore]
async fn test_past_start_date_rejected() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    let response = create_request(&client, &student_token, equipment_id, 1, -2, 2).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "PastStartDate");
}

#[tokio::test]
#[ignore]
async fn test_student_cannot_approve() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 5).await;

    let response = create_request(&client, &student_token, equipment_id, 1, 1, 2).await;
    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().unwrap();

    let response = transition(&client, &student_token, request_id, "approve").await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_student_cannot_create_equipment() {
    let client = Client::new();
    let (_, student_token) = register_user(&client, "student").await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({
            "name": unique("basketball"),
            "category": "sports",
            "quantity": 3
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_quantity_exceeding_total_rejected() {
    let client = Client::new();
    let (_, admin_token) = register_user(&client, "admin").await;
    let (_, student_token) = register_user(&client, "student").await;

    let equipment_id = create_equipment(&client, &admin_token, 3).await;

    let response = create_request(&client, &student_token, equipment_id, 4, 1, 2).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "QuantityExceedsStock");
}

#[tokio::test]
#[ignore]
async fn test_stats_requires_staff() {
    let client = Client::new();
    let (_, staff_token) = register_user(&client, "staff").await;
    let (_, student_token) = register_user(&client, "student").await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", staff_token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["equipment"]["items"].is_number());
    assert!(body["requests"]["pending"].is_number());
}
