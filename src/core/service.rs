//! Entity store traits
//!
//! The order service never talks to a storage engine directly. It goes
//! through these traits, so any backend that can answer the same lookups
//! can be plugged in.

use crate::core::entity::Entity;
use crate::entities::{Client, Order, Recipe, User};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Service trait for storing entities of one type
///
/// Implementations provide CRUD operations for a specific entity type.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Get an entity by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<T>>;

    /// List all entities, ordered by id
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Insert or replace an entity
    ///
    /// An entity with id `0` is inserted and receives a fresh id. Any other id
    /// replaces the stored entity with that id.
    async fn save(&self, entity: T) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, entity: &T) -> Result<()>;
}

/// Order-specific relation lookups
#[async_trait]
pub trait OrderRepository: DataService<Order> {
    /// All orders placed for a client
    async fn find_all_by_client_id(&self, client: &Client) -> Result<Vec<Order>>;

    /// All orders whose client is owned by a user
    async fn find_all_orders_by_user_id(&self, user: &User) -> Result<Vec<Order>>;
}

/// User-specific lookups
#[async_trait]
pub trait UserRepository: DataService<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// The set of repositories the order service reads from and writes to
#[derive(Clone)]
pub struct Repositories {
    pub orders: Arc<dyn OrderRepository>,
    pub clients: Arc<dyn DataService<Client>>,
    pub users: Arc<dyn UserRepository>,
    pub recipes: Arc<dyn DataService<Recipe>>,
}

impl Repositories {
    /// Replace the order repository, keeping the others
    pub fn with_orders(mut self, orders: Arc<dyn OrderRepository>) -> Self {
        self.orders = orders;
        self
    }
}
