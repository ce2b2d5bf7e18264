//! Entity descriptor for Order

use super::handlers::{
    OrderAppState, create_order, delete_order, get_order, list_orders, list_orders_by_client,
    list_orders_by_user, update_order,
};
use crate::server::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

/// Descriptor for the Order entity
pub struct OrderDescriptor {
    pub state: OrderAppState,
}

impl OrderDescriptor {
    pub fn new(state: OrderAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for OrderDescriptor {
    fn entity_type(&self) -> &str {
        "order"
    }

    fn base_path(&self) -> &str {
        "/order"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/order", post(create_order))
            .route("/order/list", get(list_orders))
            .route("/order/listByUserId/{id}", get(list_orders_by_user))
            .route("/order/listByClientId/{id}", get(list_orders_by_client))
            .route(
                "/order/{id}",
                get(get_order).patch(update_order).delete(delete_order),
            )
            .with_state(self.state.clone())
    }
}
