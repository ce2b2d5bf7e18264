//! Entity registry for managing entity descriptors and their routes

use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each exposed resource implements this trait to provide its routes.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "order")
    fn entity_type(&self) -> &str;

    /// Path prefix every route of this entity lives under (e.g., "/order")
    fn base_path(&self) -> &str;

    /// Build the routes for this entity, with their state already applied
    fn build_routes(&self) -> Router;
}

/// Registry for all entities in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The entity type name will be used as the key.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            tracing::debug!(
                entity_type = descriptor.entity_type(),
                base_path = descriptor.base_path(),
                "Mounting entity routes"
            );
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
