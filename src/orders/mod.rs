//! Order resource: service, HTTP handlers and route descriptor

pub mod descriptor;
pub mod handlers;
pub mod service;

pub use descriptor::OrderDescriptor;
pub use handlers::OrderAppState;
pub use service::OrderService;
