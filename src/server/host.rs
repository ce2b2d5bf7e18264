//! Server host for transport-agnostic state
//!
//! The host holds everything the exposures need: the order service, the
//! identity provider and the entity registry. It knows nothing about HTTP.

use crate::core::auth::AuthProvider;
use crate::orders::{OrderAppState, OrderDescriptor, OrderService};
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

/// Host context containing all service state
pub struct ServerHost {
    /// Order service shared by every handler
    pub order_service: Arc<OrderService>,

    /// Identity provider used by the `AuthContext` extractor
    pub auth_provider: Arc<dyn AuthProvider>,

    /// Entity registry for resource routes
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Build the host and register the order resource
    pub fn new(order_service: Arc<OrderService>, auth_provider: Arc<dyn AuthProvider>) -> Self {
        let mut entity_registry = EntityRegistry::new();
        entity_registry.register(Box::new(OrderDescriptor::new(OrderAppState {
            service: order_service.clone(),
            auth: auth_provider.clone(),
        })));

        Self {
            order_service,
            auth_provider,
            entity_registry,
        }
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
