//! Client entity

use serde::{Deserialize, Serialize};

/// A bakery client, owned by a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub name: String,
}

impl Client {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            name: name.into(),
        }
    }
}

crate::impl_entity!(Client, "client");
