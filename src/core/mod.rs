//! Core module containing fundamental traits and types for the service

pub mod access;
pub mod auth;
pub mod entity;
pub mod error;
pub mod service;

pub use access::{AccessPolicy, AccessRule, Operation, can_access};
pub use auth::{AuthContext, AuthProvider, HeaderAuthProvider, NoAuthProvider};
pub use entity::Entity;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use service::{DataService, OrderRepository, Repositories, UserRepository};
