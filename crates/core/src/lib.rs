//! `farmacontrol-core`: shared domain building blocks.
//!
//! Pure domain primitives only: identifiers, money, the clock seam and the
//! aggregate traits the inventory and cart state machines are written against.

pub mod aggregate;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BranchId, MessageId, ProductId, SaleId, UserId};
pub use money::Money;
pub use value_object::ValueObject;
