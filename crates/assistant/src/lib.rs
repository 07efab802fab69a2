//! `farmacontrol-assistant`
//!
//! Scripted product assistant. Not a language model: a query is folded to
//! plain lowercase text and matched against each product's declared uses.
//!
//! - It reads the catalog but never mutates it.
//! - [`recommend`] is a pure function; the only state is the
//!   [`Conversation`] log, owned by the caller.

pub mod conversation;
pub mod recommend;
pub mod reply;

pub use conversation::{Conversation, Message, Speaker, WELCOME};
pub use recommend::{ProductMatch, recommend};
pub use reply::{AssistantError, MAX_SUGGESTIONS, Reply, answer};
