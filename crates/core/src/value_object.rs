//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. In this
/// workspace `Money`, `TaxRate`, invoice numbers and invoice line snapshots are
/// value objects; items and invoices are entities.
///
/// ```ignore
/// let a = Money::from_cents(1299);
/// let b = Money::from_cents(1299);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
