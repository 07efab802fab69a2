//! Entity trait: identity that survives state changes.

/// Entity marker + minimal interface.
///
/// Products, branches and users are entities: a product whose stock changes
/// is still the same product.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
