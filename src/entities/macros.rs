//! Macros for reducing boilerplate when defining entities

/// Implement [`Entity`](crate::core::entity::Entity) for a struct with an `id: i64` field
///
/// # Example
/// ```rust,ignore
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Recipe {
///     pub id: i64,
///     pub name: String,
/// }
///
/// impl_entity!(Recipe, "recipe");
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $resource:expr) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $resource
            }

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        }
    };
}
