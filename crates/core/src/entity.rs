//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities (orders, stock records) keep their identity while their attribute
/// values change over time.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
