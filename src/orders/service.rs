//! Order service: existence checks, access checks, then the entity store
//!
//! Every operation takes the caller's [`AuthContext`] explicitly. Which
//! operations check ownership is decided by the [`AccessPolicy`], not by the
//! individual methods.
//!
//! Missing and inaccessible orders are reported with the same error, so a
//! caller cannot probe for records it may not see.

use validator::{Validate, ValidationErrors};

use crate::core::access::{AccessPolicy, AccessRule, Operation, can_access};
use crate::core::auth::AuthContext;
use crate::core::error::{ApiError, ApiResult};
use crate::core::service::Repositories;
use crate::entities::{Client, NewOrder, Order, OrderPatch, Recipe, User};

pub const ORDER_DOES_NOT_EXIST: &str = "Order does not exist";
pub const USER_DOES_NOT_EXIST: &str = "User does not exist";
pub const CLIENT_DOES_NOT_EXIST: &str = "Client does not exist";
pub const RECIPE_DOES_NOT_EXIST: &str = "Recipe does not exist";
pub const ID_MISMATCH: &str = "Entity id does not match PUT parameter";

/// Orchestrates reads and writes of orders
pub struct OrderService {
    repos: Repositories,
    policy: AccessPolicy,
}

impl OrderService {
    pub fn new(repos: Repositories, policy: AccessPolicy) -> Self {
        Self { repos, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    // === Access ===

    /// Resolve the acting user from the request context
    ///
    /// Anonymous callers and unknown usernames resolve to `None`.
    pub async fn resolve_actor(&self, ctx: &AuthContext) -> ApiResult<Option<User>> {
        let Some(username) = ctx.username() else {
            return Ok(None);
        };

        self.repos
            .users
            .find_by_username(username)
            .await
            .map_err(|e| store_failure("resolve actor", e))
    }

    /// Check whether `actor` may act on `order`
    ///
    /// Resolves the order's client and delegates to [`can_access`]. No actor
    /// means no access.
    pub async fn has_access(&self, order: &Order, actor: Option<&User>) -> ApiResult<bool> {
        let Some(actor) = actor else {
            return Ok(false);
        };

        let client = self.find_client(order.client_id).await?;
        Ok(can_access(order, client.as_ref(), actor))
    }

    /// Same as [`has_access`](Self::has_access), resolving the actor from `ctx`
    pub async fn has_access_in(&self, ctx: &AuthContext, order: &Order) -> ApiResult<bool> {
        let actor = self.resolve_actor(ctx).await?;
        self.has_access(order, actor.as_ref()).await
    }

    /// Apply the policy rule of `operation` to a single order
    async fn permits(
        &self,
        operation: Operation,
        ctx: &AuthContext,
        order: &Order,
    ) -> ApiResult<bool> {
        match self.policy.rule(operation) {
            AccessRule::Open => Ok(true),
            AccessRule::Owner => {
                let granted = self.has_access_in(ctx, order).await?;
                if !granted {
                    tracing::debug!(
                        operation = operation.as_str(),
                        order_id = order.id,
                        caller = ?ctx.username(),
                        "Access to order denied"
                    );
                }
                Ok(granted)
            }
        }
    }

    /// Apply the policy rule of a list `operation`, dropping inaccessible orders
    async fn visible(
        &self,
        operation: Operation,
        ctx: &AuthContext,
        orders: Vec<Order>,
    ) -> ApiResult<Vec<Order>> {
        if self.policy.rule(operation) == AccessRule::Open {
            return Ok(orders);
        }

        let actor = self.resolve_actor(ctx).await?;
        let mut visible = Vec::with_capacity(orders.len());
        for order in orders {
            if self.has_access(&order, actor.as_ref()).await? {
                visible.push(order);
            }
        }

        Ok(visible)
    }

    // === Reads ===

    /// Fetch one order
    pub async fn get_by_id(&self, ctx: &AuthContext, id: i64) -> ApiResult<Order> {
        let order = self
            .find_order(id)
            .await?
            .ok_or_else(|| ApiError::bad_request(ORDER_DOES_NOT_EXIST))?;

        if !self.permits(Operation::Get, ctx, &order).await? {
            return Err(ApiError::bad_request(ORDER_DOES_NOT_EXIST));
        }

        Ok(order)
    }

    /// All orders whose client is owned by user `id`
    pub async fn list_by_user_id(&self, ctx: &AuthContext, id: i64) -> ApiResult<Vec<Order>> {
        let user = self
            .repos
            .users
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find user", e))?
            .ok_or_else(|| ApiError::bad_request(USER_DOES_NOT_EXIST))?;

        let orders = self
            .repos
            .orders
            .find_all_orders_by_user_id(&user)
            .await
            .map_err(|e| store_failure("list orders by user", e))?;

        self.visible(Operation::ListByUser, ctx, orders).await
    }

    /// All orders of client `id`
    pub async fn list_by_client_id(&self, ctx: &AuthContext, id: i64) -> ApiResult<Vec<Order>> {
        let client = self
            .find_client(id)
            .await?
            .ok_or_else(|| ApiError::bad_request(CLIENT_DOES_NOT_EXIST))?;

        let orders = self
            .repos
            .orders
            .find_all_by_client_id(&client)
            .await
            .map_err(|e| store_failure("list orders by client", e))?;

        self.visible(Operation::ListByClient, ctx, orders).await
    }

    /// Every stored order
    pub async fn list_all(&self, ctx: &AuthContext) -> ApiResult<Vec<Order>> {
        let orders = self
            .repos
            .orders
            .find_all()
            .await
            .map_err(|e| store_failure("list orders", e))?;

        self.visible(Operation::ListAll, ctx, orders).await
    }

    // === Writes ===

    /// Create an order for an existing client and recipe
    pub async fn create(&self, ctx: &AuthContext, payload: NewOrder) -> ApiResult<Order> {
        payload.validate().map_err(validation_failure)?;

        let client = self
            .find_client(payload.client.id)
            .await?
            .ok_or_else(|| ApiError::bad_request(CLIENT_DOES_NOT_EXIST))?;

        let recipe = self
            .find_recipe(payload.recipe.id)
            .await?
            .ok_or_else(|| ApiError::bad_request(RECIPE_DOES_NOT_EXIST))?;

        let order = Order::from_resolved(&payload, &client, &recipe);

        if self.policy.requires_ownership(Operation::Create) {
            let actor = self.resolve_actor(ctx).await?;
            let granted = actor
                .as_ref()
                .is_some_and(|actor| can_access(&order, Some(&client), actor));
            if !granted {
                tracing::debug!(
                    client_id = client.id,
                    caller = ?ctx.username(),
                    "Order creation for client denied"
                );
                return Err(ApiError::bad_request(CLIENT_DOES_NOT_EXIST));
            }
        }

        self.repos
            .orders
            .save(order)
            .await
            .map_err(|e| store_failure("create order", e))
    }

    /// Merge a partial update into order `id`
    pub async fn update(&self, ctx: &AuthContext, id: i64, patch: OrderPatch) -> ApiResult<Order> {
        let existing = match self.find_order(id).await? {
            Some(order) if patch.id == Some(order.id) => order,
            _ => {
                tracing::error!(order_id = id, payload_id = ?patch.id, "{}", ID_MISMATCH);
                return Err(ApiError::entity_not_found(ID_MISMATCH));
            }
        };

        if !self.permits(Operation::Update, ctx, &existing).await? {
            return Err(ApiError::entity_not_found(ID_MISMATCH));
        }

        patch.validate().map_err(validation_failure)?;

        if let Some(client_id) = patch.changed_client(&existing) {
            self.find_client(client_id)
                .await?
                .ok_or_else(|| ApiError::bad_request(CLIENT_DOES_NOT_EXIST))?;
        }

        if let Some(recipe_id) = patch.changed_recipe(&existing) {
            self.find_recipe(recipe_id)
                .await?
                .ok_or_else(|| ApiError::bad_request(RECIPE_DOES_NOT_EXIST))?;
        }

        let mut merged = existing;
        patch.apply_to(&mut merged);

        // Moving an order to another client must not escape the policy.
        if !self.permits(Operation::Update, ctx, &merged).await? {
            return Err(ApiError::bad_request(CLIENT_DOES_NOT_EXIST));
        }

        self.repos
            .orders
            .save(merged)
            .await
            .map_err(|e| store_failure("update order", e))
    }

    /// Delete order `id`, returning its last known state
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> ApiResult<Order> {
        let order = self
            .find_order(id)
            .await?
            .ok_or_else(|| ApiError::bad_request(ORDER_DOES_NOT_EXIST))?;

        if !self.permits(Operation::Delete, ctx, &order).await? {
            return Err(ApiError::bad_request(ORDER_DOES_NOT_EXIST));
        }

        self.repos
            .orders
            .delete(&order)
            .await
            .map_err(|e| store_failure("delete order", e))?;

        Ok(order)
    }

    // === Lookups ===

    async fn find_order(&self, id: i64) -> ApiResult<Option<Order>> {
        self.repos
            .orders
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find order", e))
    }

    async fn find_client(&self, id: i64) -> ApiResult<Option<Client>> {
        self.repos
            .clients
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find client", e))
    }

    async fn find_recipe(&self, id: i64) -> ApiResult<Option<Recipe>> {
        self.repos
            .recipes
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find recipe", e))
    }
}

/// Log a store failure and keep only its message for the caller
fn store_failure(operation: &'static str, err: anyhow::Error) -> ApiError {
    let message = err.to_string();
    tracing::error!(operation, error = %message, "Entity store operation failed");
    ApiError::operation_failed(message)
}

fn validation_failure(errors: ValidationErrors) -> ApiError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();

    ApiError::bad_request(messages.join("; "))
}
