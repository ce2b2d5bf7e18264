//! Entity trait defining the core abstraction for all stored records

/// Base trait for all entities kept in the entity store.
///
/// Every entity is identified by a numeric id assigned by the store.
/// An entity that has not been persisted yet carries id `0`.
///
/// Implementations are usually generated with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The resource name used in URLs and log lines (e.g., "order", "client")
    fn resource_name() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> i64;

    /// Set the identifier (used by stores when assigning ids on save)
    fn set_id(&mut self, id: i64);

    /// Check if the entity has been assigned an id by the store
    fn is_persisted(&self) -> bool {
        self.id() > 0
    }
}
