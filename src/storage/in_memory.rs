//! In-memory entity store for development and testing
//!
//! Each entity type lives in an [`InMemoryTable`]: a `BTreeMap` keyed by id
//! behind an `RwLock`, plus an atomic id sequence. The repositories share
//! table handles, so the order repository can answer joins against clients
//! and enforce foreign keys the way a relational store would.

use crate::config::{SeedData, SeedOrder};
use crate::core::entity::Entity;
use crate::core::service::{DataService, OrderRepository, Repositories, UserRepository};
use crate::entities::{Client, Order, Recipe, User};
use crate::storage::StorageError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Rows<T> = BTreeMap<i64, T>;

/// Thread-safe table of one entity type
#[derive(Clone)]
pub struct InMemoryTable<T> {
    rows: Arc<RwLock<Rows<T>>>,
    sequence: Arc<AtomicI64>,
}

impl<T: Entity> InMemoryTable<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows<T>>, StorageError> {
        self.rows.read().map_err(|_| StorageError::LockPoisoned {
            table: T::resource_name(),
            access: "read",
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows<T>>, StorageError> {
        self.rows.write().map_err(|_| StorageError::LockPoisoned {
            table: T::resource_name(),
            access: "write",
        })
    }

    pub fn contains(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }

    /// Rows matching a predicate, ordered by id
    pub fn select(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>, StorageError> {
        Ok(self
            .read()?
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    /// Insert or replace a row after `check` accepts it
    ///
    /// `check` runs under the table's write lock, so constraints it verifies
    /// against the table cannot be raced by another writer.
    pub fn upsert_checked(
        &self,
        mut entity: T,
        check: impl FnOnce(&Rows<T>, &T) -> Result<(), StorageError>,
    ) -> Result<T, StorageError> {
        let mut rows = self.write()?;
        check(&rows, &entity)?;

        if entity.is_persisted() {
            self.sequence.fetch_max(entity.id(), Ordering::SeqCst);
        } else {
            // Writers hold the table lock, so load then store cannot race.
            let id = self
                .sequence
                .load(Ordering::SeqCst)
                .checked_add(1)
                .ok_or(StorageError::IdsExhausted {
                    table: T::resource_name(),
                })?;
            self.sequence.store(id, Ordering::SeqCst);
            entity.set_id(id);
        }

        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    pub fn upsert(&self, entity: T) -> Result<T, StorageError> {
        self.upsert_checked(entity, |_, _| Ok(()))
    }

    pub fn remove(&self, id: i64) -> Result<T, StorageError> {
        self.write()?.remove(&id).ok_or(StorageError::RowNotFound {
            table: T::resource_name(),
            id,
        })
    }
}

impl<T: Entity> Default for InMemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryTable<T> {
    async fn find_by_id(&self, id: i64) -> Result<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.select(|_| true)?)
    }

    async fn save(&self, entity: T) -> Result<T> {
        Ok(self.upsert(entity)?)
    }

    async fn delete(&self, entity: &T) -> Result<()> {
        self.remove(entity.id())?;
        Ok(())
    }
}

/// Order repository with client/recipe foreign keys
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: InMemoryTable<Order>,
    clients: InMemoryTable<Client>,
    recipes: InMemoryTable<Recipe>,
}

impl InMemoryOrderRepository {
    pub fn new(
        orders: InMemoryTable<Order>,
        clients: InMemoryTable<Client>,
        recipes: InMemoryTable<Recipe>,
    ) -> Self {
        Self {
            orders,
            clients,
            recipes,
        }
    }

    fn check_references(&self, order: &Order) -> Result<(), StorageError> {
        if !self.clients.contains(order.client_id)? {
            return Err(StorageError::ForeignKeyViolation {
                table: Order::resource_name(),
                id: order.id,
                referenced: Client::resource_name(),
                referenced_id: order.client_id,
            });
        }

        if !self.recipes.contains(order.recipe_id)? {
            return Err(StorageError::ForeignKeyViolation {
                table: Order::resource_name(),
                id: order.id,
                referenced: Recipe::resource_name(),
                referenced_id: order.recipe_id,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl DataService<Order> for InMemoryOrderRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        self.orders.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        self.orders.find_all().await
    }

    async fn save(&self, order: Order) -> Result<Order> {
        Ok(self
            .orders
            .upsert_checked(order, |_, order| self.check_references(order))?)
    }

    async fn delete(&self, order: &Order) -> Result<()> {
        self.orders.delete(order).await
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_all_by_client_id(&self, client: &Client) -> Result<Vec<Order>> {
        Ok(self.orders.select(|order| order.client_id == client.id)?)
    }

    async fn find_all_orders_by_user_id(&self, user: &User) -> Result<Vec<Order>> {
        let owned: BTreeSet<i64> = self
            .clients
            .select(|client| client.user_id == user.id)?
            .into_iter()
            .map(|client| client.id)
            .collect();

        Ok(self
            .orders
            .select(|order| owned.contains(&order.client_id))?)
    }
}

/// User repository with a unique username index
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: InMemoryTable<User>,
}

impl InMemoryUserRepository {
    pub fn new(users: InMemoryTable<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl DataService<User> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.users.find_all().await
    }

    async fn save(&self, user: User) -> Result<User> {
        Ok(self.users.upsert_checked(user, |rows, user| {
            let taken = rows
                .values()
                .any(|existing| existing.username == user.username && existing.id != user.id);

            if taken {
                return Err(StorageError::UniqueViolation {
                    table: User::resource_name(),
                    column: "username",
                    value: user.username.clone(),
                });
            }

            Ok(())
        })?)
    }

    async fn delete(&self, user: &User) -> Result<()> {
        self.users.delete(user).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .select(|user| user.username == username)?
            .into_iter()
            .next())
    }
}

/// Aggregated in-memory store containing all tables
#[derive(Clone)]
pub struct InMemoryDataStore {
    pub orders: InMemoryOrderRepository,
    pub clients: InMemoryTable<Client>,
    pub users: InMemoryUserRepository,
    pub recipes: InMemoryTable<Recipe>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        let clients = InMemoryTable::new();
        let recipes = InMemoryTable::new();

        Self {
            orders: InMemoryOrderRepository::new(
                InMemoryTable::new(),
                clients.clone(),
                recipes.clone(),
            ),
            clients,
            users: InMemoryUserRepository::new(InMemoryTable::new()),
            recipes,
        }
    }

    /// Repository handles backed by this store
    pub fn repositories(&self) -> Repositories {
        Repositories {
            orders: Arc::new(self.orders.clone()),
            clients: Arc::new(self.clients.clone()),
            users: Arc::new(self.users.clone()),
            recipes: Arc::new(self.recipes.clone()),
        }
    }

    /// Load fixtures, parents first so foreign keys resolve
    ///
    /// Every fixture must carry a positive id.
    pub async fn seed(&self, seed: &SeedData) -> Result<()> {
        seed.users.iter().try_for_each(require_seed_id)?;
        seed.clients.iter().try_for_each(require_seed_id)?;
        seed.recipes.iter().try_for_each(require_seed_id)?;
        for order in &seed.orders {
            if order.id <= 0 {
                return Err(StorageError::InvalidId {
                    table: Order::resource_name(),
                    id: order.id,
                }
                .into());
            }
        }

        for user in &seed.users {
            self.users.save(user.clone()).await?;
        }
        for client in &seed.clients {
            self.clients.save(client.clone()).await?;
        }
        for recipe in &seed.recipes {
            self.recipes.save(recipe.clone()).await?;
        }
        for order in &seed.orders {
            self.orders.save(seed_order(order)).await?;
        }

        tracing::info!(
            users = seed.users.len(),
            clients = seed.clients.len(),
            recipes = seed.recipes.len(),
            orders = seed.orders.len(),
            "Seeded in-memory store"
        );

        Ok(())
    }
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require_seed_id<T: Entity>(entity: &T) -> Result<(), StorageError> {
    if entity.is_persisted() {
        Ok(())
    } else {
        Err(StorageError::InvalidId {
            table: T::resource_name(),
            id: entity.id(),
        })
    }
}

fn seed_order(seed: &SeedOrder) -> Order {
    let now = Utc::now();
    Order {
        id: seed.id,
        client_id: seed.client_id,
        recipe_id: seed.recipe_id,
        quantity: seed.quantity,
        delivery_date: seed.delivery_date,
        notes: seed.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}
