//! Order entity, create payload and partial-update payload

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Client, Recipe};

/// A client's order for a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Owning client
    pub client_id: i64,
    pub recipe_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_entity!(Order, "order");

impl Order {
    /// Build an unsaved order from a create payload and the stored client and
    /// recipe it was resolved against.
    ///
    /// Only the ids of the resolved records are used; nested data sent by the
    /// caller never reaches the order.
    pub fn from_resolved(payload: &NewOrder, client: &Client, recipe: &Recipe) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            client_id: client.id,
            recipe_id: recipe.id,
            quantity: payload.quantity,
            delivery_date: payload.delivery_date,
            notes: payload.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reference to another entity by id, as sent on the wire (`{"id": 3}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

fn default_quantity() -> i32 {
    1
}

/// Body of `POST /order`
///
/// A caller-supplied `id` is ignored; the store assigns one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewOrder {
    #[serde(alias = "clientId")]
    pub client: EntityRef,
    pub recipe: EntityRef,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn new(client_id: i64, recipe_id: i64) -> Self {
        Self {
            client: EntityRef::new(client_id),
            recipe: EntityRef::new(recipe_id),
            quantity: default_quantity(),
            delivery_date: None,
            notes: None,
        }
    }
}

/// Body of `PATCH /order/{id}`
///
/// Every field is optional. A missing or `null` field leaves the stored value
/// untouched; `id` must be present and equal to the path id.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "clientId")]
    pub client: Option<EntityRef>,
    #[serde(default)]
    pub recipe: Option<EntityRef>,
    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

impl OrderPatch {
    pub fn for_order(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Merge the present fields into `order`
    ///
    /// Returns `true` if any stored value changed. `updated_at` is only
    /// touched in that case, so applying the same patch twice leaves the
    /// order exactly as applying it once.
    pub fn apply_to(&self, order: &mut Order) -> bool {
        let mut changed = false;

        changed |= merge_field(&mut order.client_id, self.client.map(|c| c.id));
        changed |= merge_field(&mut order.recipe_id, self.recipe.map(|r| r.id));
        changed |= merge_field(&mut order.quantity, self.quantity);
        changed |= merge_optional(&mut order.delivery_date, self.delivery_date);
        changed |= merge_optional(&mut order.notes, self.notes.clone());

        if changed {
            order.updated_at = Utc::now();
        }

        changed
    }

    /// Client reference that differs from the one currently stored, if any
    pub fn changed_client(&self, order: &Order) -> Option<i64> {
        self.client.map(|c| c.id).filter(|id| *id != order.client_id)
    }

    /// Recipe reference that differs from the one currently stored, if any
    pub fn changed_recipe(&self, order: &Order) -> Option<i64> {
        self.recipe.map(|r| r.id).filter(|id| *id != order.recipe_id)
    }
}

fn merge_field<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

fn merge_optional<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}
