//! Domain entities of the bakery backend

#[macro_use]
pub mod macros;

pub mod client;
pub mod order;
pub mod recipe;
pub mod user;

pub use client::Client;
pub use order::{EntityRef, NewOrder, Order, OrderPatch};
pub use recipe::Recipe;
pub use user::{Role, User};
