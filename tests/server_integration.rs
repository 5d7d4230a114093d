//! HTTP API tests against a server bound to an ephemeral port

mod common;

use cityforge::server::{build_router, SessionStore};
use common::{generator, scripted_client};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server() -> String {
    let (generator, _) = generator(scripted_client("₹14,00,000").build());
    let store = Arc::new(SessionStore::new(generator));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(store)).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

#[tokio::test]
async fn test_plan_session_over_http() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let created: Value = client
        .post(format!("{base}/plans"))
        .json(&json!({ "description": "a small coastal town" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["state"]["stage"], "done");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let conflict = client
        .post(format!("{base}/plans/{id}/finalize"))
        .send()
        .await
        .unwrap();
    assert_eq!(conflict.status(), 409);

    let optimized: Value = client
        .post(format!("{base}/plans/{id}/optimize"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(optimized["data"]["stage"], "optimized");

    let fetched: Value = client
        .get(format!("{base}/plans/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["data"]["overBudget"], true);

    let deleted = client
        .delete(format!("{base}/plans/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);

    let missing = client.get(format!("{base}/plans/{id}")).send().await.unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_empty_description_is_rejected() {
    let base = spawn_server().await;
    let response = reqwest::Client::new()
        .post(format!("{base}/plans"))
        .json(&json!({ "description": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_reset_session_can_start_again() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/plans"))
        .json(&json!({ "description": "a river town" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let reset = client
        .post(format!("{base}/plans/{id}/reset"))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), 200);

    let started: Value = client
        .post(format!("{base}/plans/{id}/start"))
        .json(&json!({ "description": "a desert outpost" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["success"], true);
    assert_eq!(started["data"]["stage"], "done");
    assert_eq!(started["data"]["description"], "a desert outpost");
}
