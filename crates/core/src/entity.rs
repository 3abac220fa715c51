//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog items and invoices are entities: an update replaces their state but
/// keeps their identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
