//! # Bakery Orders
//!
//! Order resource of a bakery management backend, with per-order ownership
//! access control.
//!
//! ## Features
//!
//! - **Order CRUD**: create, read, partial update, delete and list orders
//! - **Ownership Checks**: an order is visible to a caller only when the caller
//!   owns the client that placed it, or is an administrator
//! - **Configurable Enforcement**: choose per operation whether ownership is checked
//! - **Pluggable Identity**: resolve the caller from a request header or plug in your own provider
//! - **In-Memory Storage**: relational-style tables with foreign key checks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bakery::prelude::*;
//!
//! let store = InMemoryDataStore::new();
//! store.seed(&config.seed).await?;
//!
//! ServerBuilder::new()
//!     .with_repositories(store.repositories())
//!     .with_auth_provider(HeaderAuthProvider::new("x-username")?)
//!     .with_access_policy(AccessPolicy::strict())
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        access::{AccessPolicy, AccessRule, Operation, can_access},
        auth::{AuthContext, AuthProvider, HeaderAuthProvider, NoAuthProvider},
        entity::Entity,
        error::{ApiError, ApiResult},
        service::{DataService, OrderRepository, Repositories, UserRepository},
    };

    // === Entities ===
    pub use crate::entities::{Client, EntityRef, NewOrder, Order, OrderPatch, Recipe, Role, User};

    // === Orders ===
    pub use crate::orders::OrderService;

    // === Storage ===
    pub use crate::storage::InMemoryDataStore;

    // === Config ===
    pub use crate::config::{AppConfig, SeedData};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
