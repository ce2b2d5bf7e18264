//! Order HTTP handlers

use super::service::OrderService;
use crate::core::auth::{AuthContext, AuthProvider};
use crate::core::error::ApiResult;
use crate::entities::{NewOrder, Order, OrderPatch};
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// Order-specific AppState
#[derive(Clone, FromRef)]
pub struct OrderAppState {
    pub service: Arc<OrderService>,
    pub auth: Arc<dyn AuthProvider>,
}

pub async fn get_order(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Order>> {
    service.get_by_id(&ctx, id).await.map(Json)
}

pub async fn list_orders(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
) -> ApiResult<Json<Vec<Order>>> {
    service.list_all(&ctx).await.map(Json)
}

pub async fn list_orders_by_user(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Order>>> {
    service.list_by_user_id(&ctx, id).await.map(Json)
}

pub async fn list_orders_by_client(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Order>>> {
    service.list_by_client_id(&ctx, id).await.map(Json)
}

pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Json(payload): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = service.create(&ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Path(id): Path<i64>,
    Json(patch): Json<OrderPatch>,
) -> ApiResult<Json<Order>> {
    service.update(&ctx, id, patch).await.map(Json)
}

pub async fn delete_order(
    State(service): State<Arc<OrderService>>,
    ctx: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Order>> {
    service.delete(&ctx, id).await.map(Json)
}
