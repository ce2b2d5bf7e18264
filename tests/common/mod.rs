//! Shared fixtures for the integration tests

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bakery::prelude::*;
use bakery::storage::InMemoryOrderRepository;
use std::sync::Arc;

/// Ids of the records loaded by [`seeded_store`]
///
/// `owner`, `rival` and `clerk` each own one client with one order.
pub struct Fixture {
    pub store: InMemoryDataStore,
    pub admin: User,
    pub owner: User,
    pub rival: User,
    pub clerk: User,
    pub owner_client: Client,
    pub rival_client: Client,
    pub clerk_client: Client,
    pub baguette: Recipe,
    pub croissant: Recipe,
    pub owner_order: Order,
    pub rival_order: Order,
    pub clerk_order: Order,
}

impl Fixture {
    pub fn service(&self, policy: AccessPolicy) -> OrderService {
        OrderService::new(self.store.repositories(), policy)
    }

    pub async fn order_count(&self) -> usize {
        self.store.orders.find_all().await.unwrap().len()
    }
}

pub fn as_user(user: &User) -> AuthContext {
    AuthContext::user(user.username.clone())
}

pub async fn seeded_store() -> Fixture {
    let store = InMemoryDataStore::new();

    let admin = store.users.save(User::new("admin", Role::Admin)).await.unwrap();
    let owner = store
        .users
        .save(User::new("owner", Role::Superuser))
        .await
        .unwrap();
    let rival = store
        .users
        .save(User::new("rival", Role::Superuser))
        .await
        .unwrap();
    let clerk = store.users.save(User::new("clerk", Role::User)).await.unwrap();

    let owner_client = store
        .clients
        .save(Client::new(owner.id, "Le Fournil"))
        .await
        .unwrap();
    let rival_client = store
        .clients
        .save(Client::new(rival.id, "Pain Quotidien"))
        .await
        .unwrap();
    let clerk_client = store
        .clients
        .save(Client::new(clerk.id, "Corner Cafe"))
        .await
        .unwrap();

    let baguette = store.recipes.save(Recipe::new("Baguette")).await.unwrap();
    let croissant = store.recipes.save(Recipe::new("Croissant")).await.unwrap();

    let owner_order = place(&store, &owner_client, &baguette).await;
    let rival_order = place(&store, &rival_client, &baguette).await;
    let clerk_order = place(&store, &clerk_client, &croissant).await;

    Fixture {
        store,
        admin,
        owner,
        rival,
        clerk,
        owner_client,
        rival_client,
        clerk_client,
        baguette,
        croissant,
        owner_order,
        rival_order,
        clerk_order,
    }
}

async fn place(store: &InMemoryDataStore, client: &Client, recipe: &Recipe) -> Order {
    let payload = NewOrder::new(client.id, recipe.id);
    store
        .orders
        .save(Order::from_resolved(&payload, client, recipe))
        .await
        .unwrap()
}

/// Order repository whose reads succeed and whose writes always fail
pub struct FailingOrderRepository {
    inner: InMemoryOrderRepository,
}

impl FailingOrderRepository {
    pub fn new(inner: InMemoryOrderRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DataService<Order> for FailingOrderRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        self.inner.find_all().await
    }

    async fn save(&self, _order: Order) -> Result<Order> {
        Err(anyhow!("disk full"))
    }

    async fn delete(&self, _order: &Order) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

#[async_trait]
impl OrderRepository for FailingOrderRepository {
    async fn find_all_by_client_id(&self, client: &Client) -> Result<Vec<Order>> {
        self.inner.find_all_by_client_id(client).await
    }

    async fn find_all_orders_by_user_id(&self, user: &User) -> Result<Vec<Order>> {
        self.inner.find_all_orders_by_user_id(user).await
    }
}

/// Repositories of `fixture` with every order write failing
pub fn failing_repositories(fixture: &Fixture) -> Repositories {
    fixture
        .store
        .repositories()
        .with_orders(Arc::new(FailingOrderRepository::new(
            fixture.store.orders.clone(),
        )))
}
