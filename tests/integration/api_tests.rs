//! API integration tests
//!
//! These run against a live server with a freshly migrated database:
//! `cargo test -- --ignored`

use chrono::{Days, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// A client with a cookie store, so the session cookie rides along
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client")
}

fn unique_username() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

/// Sign up a fresh user and return its authenticated client
async fn signed_up_client() -> Client {
    let client = client();
    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "username": unique_username(),
            "password": "correct-horse"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);
    client
}

/// Find a book by exact title via the search endpoint
async fn find_book(client: &Client, title: &str) -> Value {
    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .query(&[("q", title)])
        .send()
        .await
        .expect("Failed to send search request");
    assert!(response.status().is_success());

    let books: Vec<Value> = response.json().await.expect("Failed to parse search response");
    books
        .into_iter()
        .find(|b| b["title"] == title)
        .unwrap_or_else(|| panic!("Seeded book {:?} not found", title))
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
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
async fn test_signup_and_me() {
    let client = client();
    let username = unique_username();

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "username": username, "password": "secret4" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["username"], username.as_str());
    // The password hash must never leak
    assert!(body["user"].get("password").is_none());

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let me: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(me["username"], username.as_str());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_signup_conflict() {
    let username = unique_username();

    let first = client()
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "username": username, "password": "secret4" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client()
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "username": username, "password": "other-pass" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["error"], "Conflict");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_signup_single_winner() {
    let username = unique_username();

    let signup = |password: &str| {
        let client = client();
        let body = json!({ "username": username, "password": password });
        async move {
            client
                .post(format!("{}/auth/signup", BASE_URL))
                .json(&body)
                .send()
                .await
                .expect("Failed to send signup request")
                .status()
                .as_u16()
        }
    };

    let (a, b) = tokio::join!(signup("alice-pass"), signup("bob-pass"));

    let mut statuses = [a, b];
    statuses.sort();
    assert_eq!(statuses, [201, 409], "exactly one signup may win");

    // Exactly one account exists, holding the winner's password
    let winner_pass = if a == 201 { "alice-pass" } else { "bob-pass" };
    let loser_pass = if a == 201 { "bob-pass" } else { "alice-pass" };

    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": winner_pass }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": loser_pass }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let username = unique_username();

    let response = client()
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "username": username, "password": "secret4" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let response = client()
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_empty_search_equals_full_catalog() {
    let client = signed_up_client().await;

    let all: Vec<Value> = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let searched: Vec<Value> = client
        .get(format!("{}/books/search?q=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let ids = |books: &[Value]| -> Vec<i64> {
        books.iter().map(|b| b["id"].as_i64().unwrap()).collect()
    };
    assert_eq!(ids(&all), ids(&searched));
    assert!(!all.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_search_wildcards_match_literally() {
    let client = signed_up_client().await;

    // No seeded title, author or ISBN contains a literal percent sign,
    // so this must match nothing rather than everything
    let books: Vec<Value> = client
        .get(format!("{}/books/search", BASE_URL))
        .query(&[("q", "%")])
        .send()
        .await
        .expect("Failed to send search request")
        .json()
        .await
        .expect("Failed to parse search response");
    assert!(books.is_empty());

    let books: Vec<Value> = client
        .get(format!("{}/books/search", BASE_URL))
        .query(&[("q", "D_ne")])
        .send()
        .await
        .expect("Failed to send search request")
        .json()
        .await
        .expect("Failed to parse search response");
    assert!(books.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_cycle() {
    let borrower = signed_up_client().await;

    let book = find_book(&borrower, "Dune").await;
    let book_id = book["id"].as_i64().expect("No book ID");
    assert_eq!(book["available"], true, "Dune must start available");

    // Borrow
    let response = borrower
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let expected_due = Utc::now().date_naive() + Days::new(14);
    assert_eq!(
        body["record"]["due_date"],
        expected_due.format("%Y-%m-%d").to_string()
    );
    assert_eq!(body["record"]["title"], "Dune");

    // The catalog now shows the book as unavailable
    let book = find_book(&borrower, "Dune").await;
    assert_eq!(book["available"], false);

    // The borrowed list has exactly one entry
    let borrows: Vec<Value> = borrower
        .get(format!("{}/borrows", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(borrows.len(), 1);
    assert_eq!(borrows[0]["book_id"].as_i64(), Some(book_id));

    // A second user cannot borrow it
    let other = signed_up_client().await;
    let response = other
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);

    // Return
    let response = borrower
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let book = find_book(&borrower, "Dune").await;
    assert_eq!(book["available"], true);

    let borrows: Vec<Value> = borrower
        .get(format!("{}/borrows", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(borrows.is_empty());

    // Returning again is not a silent no-op: no record, no state change
    let response = borrower
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_return_without_record_leaves_availability() {
    let client = signed_up_client().await;

    let book = find_book(&client, "Solaris").await;
    let book_id = book["id"].as_i64().expect("No book ID");
    let available_before = book["available"].as_bool().unwrap();

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 404);

    let book = find_book(&client, "Solaris").await;
    assert_eq!(book["available"].as_bool().unwrap(), available_before);
}

#[tokio::test]
#[ignore]
async fn test_borrow_missing_book() {
    let client = signed_up_client().await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({ "book_id": 999_999 }))
        .send()
        .await
        .expect("Failed to send borrow request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrow_single_winner() {
    let alice = signed_up_client().await;
    let bob = signed_up_client().await;

    let book = find_book(&alice, "Foundation").await;
    let book_id = book["id"].as_i64().expect("No book ID");
    assert_eq!(book["available"], true, "Foundation must start available");

    let borrow = |client: &Client| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/borrows", BASE_URL))
                .json(&json!({ "book_id": book_id }))
                .send()
                .await
                .expect("Failed to send borrow request")
                .status()
                .as_u16()
        }
    };

    let (a, b) = tokio::join!(borrow(&alice), borrow(&bob));

    let mut statuses = [a, b];
    statuses.sort();
    assert_eq!(statuses, [201, 409], "exactly one borrow may win");

    // Restore the seeded state
    let winner = if a == 201 { &alice } else { &bob };
    let response = winner
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_change_password_requires_current() {
    let client = client();
    let username = unique_username();

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "username": username, "password": "old-pass" }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    // Wrong current password is rejected
    let response = client
        .put(format!("{}/account/password", BASE_URL))
        .json(&json!({ "current_password": "guess", "new_password": "new-pass" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Correct current password succeeds
    let response = client
        .put(format!("{}/account/password", BASE_URL))
        .json(&json!({ "current_password": "old-pass", "new_password": "new-pass" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Old password no longer works, new one does
    let response = self::client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "old-pass" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 401);

    let response = self::client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "new-pass" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_logout_invalidates_session() {
    let client = signed_up_client().await;

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send logout request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}
