//! Tests against a server started with `bibliotheca serve`

use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

#[tokio::test]
#[ignore]
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
async fn test_ready_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_home_lists_tables() {
    let client = Client::new();

    let body = client
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    for table in ["books", "users", "loans"] {
        assert!(body.contains(&format!("<h2>{}</h2>", table)));
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_search() {
    let client = Client::new();

    let body = client
        .post(format!("{}/books/search", BASE_URL))
        .form(&[("field", "title"), ("value", "No Such Title Anywhere")])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(body.contains("Book not found."));
}
