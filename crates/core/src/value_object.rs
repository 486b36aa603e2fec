//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared entirely by their attribute
/// values: two line items with the same product, quantity and price are the
/// same value; an order, by contrast, is an [`Entity`](crate::Entity) — it
/// stays itself while its totals change.
///
/// To "modify" a value object, construct a new one. The trait only requires
/// `Clone + PartialEq + Debug` so values stay cheap to copy, comparable and
/// debuggable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
