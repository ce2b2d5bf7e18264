//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires repositories, the identity provider and the access
//! policy into a `ServerHost`, which the REST exposure turns into a router.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
