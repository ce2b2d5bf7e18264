//! End-to-end tests of the REST surface
//!
//! These tests drive the router built by `ServerBuilder` over HTTP and check
//! status codes, error bodies and the identity header.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use bakery::prelude::*;
use common::{Fixture, failing_repositories, seeded_store};
use serde_json::{Value, json};

const USERNAME: HeaderName = HeaderName::from_static("x-username");

fn server_for(fx: &Fixture, policy: AccessPolicy) -> TestServer {
    let app = ServerBuilder::new()
        .with_repositories(fx.store.repositories())
        .with_access_policy(policy)
        .build()
        .expect("Failed to build router");
    TestServer::new(app).expect("Failed to create test server")
}

fn header(username: &'static str) -> HeaderValue {
    HeaderValue::from_static(username)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    for path in ["/health", "/healthz"] {
        let response = server.get(path).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "bakery-orders");
    }
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_get_own_order() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .get(&format!("/order/{}", fx.owner_order.id))
        .add_header(USERNAME, header("owner"))
        .await;
    response.assert_status_ok();

    let order: Order = response.json();
    assert_eq!(order, fx.owner_order);
}

#[tokio::test]
async fn test_get_foreign_order_is_bad_request() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .get(&format!("/order/{}", fx.rival_order.id))
        .add_header(USERNAME, header("owner"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["message"], "Order does not exist");
}

#[tokio::test]
async fn test_get_without_identity_is_bad_request() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server.get(&format!("/order/{}", fx.owner_order.id)).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_identity_header_is_unauthorized() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .get(&format!("/order/{}", fx.owner_order.id))
        .add_header(USERNAME, HeaderValue::from_bytes(b"\xffowner").unwrap())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected_before_the_service() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server.get("/order/abc").add_header(USERNAME, header("admin")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_endpoints() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let all: Vec<Order> = server.get("/order/list").await.json();
    assert_eq!(all.len(), 3);

    let by_user: Vec<Order> = server
        .get(&format!("/order/listByUserId/{}", fx.clerk.id))
        .await
        .json();
    assert_eq!(by_user, vec![fx.clerk_order.clone()]);

    let by_client: Vec<Order> = server
        .get(&format!("/order/listByClientId/{}", fx.rival_client.id))
        .await
        .json();
    assert_eq!(by_client, vec![fx.rival_order.clone()]);

    let response = server.get("/order/listByUserId/9999").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "User does not exist");
}

#[tokio::test]
async fn test_strict_list_only_shows_accessible_orders() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::strict());

    let mine: Vec<Order> = server
        .get("/order/list")
        .add_header(USERNAME, header("rival"))
        .await
        .json();

    assert_eq!(mine, vec![fx.rival_order.clone()]);
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_returns_created() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .post("/order")
        .add_header(USERNAME, header("owner"))
        .json(&json!({
            "id": 42,
            "client": { "id": fx.owner_client.id, "name": "ignored" },
            "recipe": { "id": fx.baguette.id },
            "quantity": 6,
            "delivery_date": "2026-12-24"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let order: Order = response.json();
    assert_eq!(order.id, 4);
    assert_eq!(order.client_id, fx.owner_client.id);
    assert_eq!(order.quantity, 6);
    assert_eq!(order.delivery_date.map(|d| d.to_string()).as_deref(), Some("2026-12-24"));
}

#[tokio::test]
async fn test_create_accepts_client_id_alias() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .post("/order")
        .json(&json!({
            "clientId": { "id": fx.clerk_client.id },
            "recipe": { "id": fx.croissant.id }
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let order: Order = response.json();
    assert_eq!(order.client_id, fx.clerk_client.id);
    assert_eq!(order.quantity, 1);
}

#[tokio::test]
async fn test_create_with_unknown_recipe() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .post("/order")
        .json(&json!({
            "client": { "id": fx.owner_client.id },
            "recipe": { "id": 9999 }
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["message"], "Recipe does not exist");
    assert_eq!(fx.order_count().await, 3);
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .patch(&format!("/order/{}", fx.owner_order.id))
        .json(&json!({
            "id": fx.owner_order.id,
            "notes": "Leave at the back door",
            "quantity": null
        }))
        .await;
    response.assert_status_ok();

    let order: Order = response.json();
    assert_eq!(order.notes.as_deref(), Some("Leave at the back door"));
    assert_eq!(order.quantity, fx.owner_order.quantity);
}

#[tokio::test]
async fn test_patch_with_mismatched_id_is_not_found() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .patch(&format!("/order/{}", fx.owner_order.id))
        .json(&json!({ "id": fx.rival_order.id, "quantity": 3 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
    assert_eq!(body["message"], "Entity id does not match PUT parameter");
}

#[tokio::test]
async fn test_patch_with_invalid_quantity_is_bad_request() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .patch(&format!("/order/{}", fx.owner_order.id))
        .json(&json!({ "id": fx.owner_order.id, "quantity": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["message"], "quantity must be at least 1");
}

#[tokio::test]
async fn test_delete_returns_deleted_order() {
    let fx = seeded_store().await;
    let server = server_for(&fx, AccessPolicy::default());

    let response = server
        .delete(&format!("/order/{}", fx.rival_order.id))
        .add_header(USERNAME, header("admin"))
        .await;
    response.assert_status_ok();

    let order: Order = response.json();
    assert_eq!(order, fx.rival_order);

    let again = server
        .delete(&format!("/order/{}", fx.rival_order.id))
        .add_header(USERNAME, header("admin"))
        .await;
    again.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let fx = seeded_store().await;
    let app = ServerBuilder::new()
        .with_repositories(failing_repositories(&fx))
        .build()
        .expect("Failed to build router");
    let server = TestServer::new(app).expect("Failed to create test server");

    let response = server
        .post("/order")
        .json(&json!({
            "client": { "id": fx.owner_client.id },
            "recipe": { "id": fx.baguette.id }
        }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["code"], "OPERATION_FAILED");
    assert_eq!(body["message"], "disk full");
}
