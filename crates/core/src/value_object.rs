//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// `Money` and cart lines are compared by their attributes; two amounts of
/// `R$ 12,50` are the same amount.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
