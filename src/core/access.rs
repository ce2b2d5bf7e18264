//! Ownership-based access control for orders
//!
//! Two pieces:
//! - [`can_access`]: the evaluator. Pure function over an order, its resolved
//!   client and the acting user.
//! - [`AccessPolicy`]: which operations consult the evaluator at all.

use serde::{Deserialize, Serialize};

use crate::entities::{Client, Order, Role, User};

/// Decide whether `actor` may act on `order`
///
/// `client` is the stored client resolved from `order.client_id`; `None` when
/// that client no longer exists, which always denies.
///
/// Access is granted when the actor is an `ADMIN`, or when the actor is a
/// `SUPERUSER` who owns the order's client. Every other role is denied.
pub fn can_access(order: &Order, client: Option<&Client>, actor: &User) -> bool {
    let Some(client) = client else {
        return false;
    };

    if client.id != order.client_id {
        return false;
    }

    (client.user_id == actor.id && actor.role == Role::Superuser) || actor.role == Role::Admin
}

/// Operations on the order resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    ListAll,
    ListByUser,
    ListByClient,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::ListAll => "list_all",
            Operation::ListByUser => "list_by_user",
            Operation::ListByClient => "list_by_client",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Whether an operation consults the access evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// No access check
    Open,

    /// The acting user must pass [`can_access`]
    Owner,
}

/// Access rule per operation
///
/// [`AccessPolicy::default`] enforces ownership on `get` and `delete` only,
/// which is how the order endpoint has always behaved.
/// [`AccessPolicy::strict`] enforces it everywhere.
///
/// Missing entries in a configured table fall back to the default rule.
/// Unknown entries are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessPolicy {
    pub get: AccessRule,
    pub list_all: AccessRule,
    pub list_by_user: AccessRule,
    pub list_by_client: AccessRule,
    pub create: AccessRule,
    pub update: AccessRule,
    pub delete: AccessRule,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            get: AccessRule::Owner,
            list_all: AccessRule::Open,
            list_by_user: AccessRule::Open,
            list_by_client: AccessRule::Open,
            create: AccessRule::Open,
            update: AccessRule::Open,
            delete: AccessRule::Owner,
        }
    }
}

impl AccessPolicy {
    /// Ownership enforced on every operation
    pub fn strict() -> Self {
        Self::uniform(AccessRule::Owner)
    }

    pub fn uniform(rule: AccessRule) -> Self {
        Self {
            get: rule,
            list_all: rule,
            list_by_user: rule,
            list_by_client: rule,
            create: rule,
            update: rule,
            delete: rule,
        }
    }

    /// Parse a named preset ("default" or "strict")
    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    /// Get the rule for an operation
    pub fn rule(&self, operation: Operation) -> AccessRule {
        match operation {
            Operation::Get => self.get,
            Operation::ListAll => self.list_all,
            Operation::ListByUser => self.list_by_user,
            Operation::ListByClient => self.list_by_client,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn requires_ownership(&self, operation: Operation) -> bool {
        self.rule(operation) == AccessRule::Owner
    }
}
