//! Branch and staff directory (read-only).

pub mod branch;
pub mod directory;
pub mod user;

pub use branch::{Branch, BranchStatus};
pub use directory::Directory;
pub use user::{BranchScope, Role, User, UserStatus};
