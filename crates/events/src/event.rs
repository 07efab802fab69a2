use chrono::{DateTime, Utc};

/// A domain event: an immutable fact about a state change.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted name (e.g. `"sales.cart.item_added"`).
    fn event_type(&self) -> &'static str;

    /// When the change happened (business time, from the injected clock).
    fn occurred_at(&self) -> DateTime<Utc>;
}
