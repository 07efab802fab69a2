//! `farmacontrol-app`
//!
//! Composition root for the pharmacy dashboard: configuration, the seed
//! fixture, the timer queue and the [`Dashboard`] store that owns all state.

pub mod config;
pub mod dashboard;
pub mod fixtures;
pub mod timers;

pub use config::{AppConfig, ConfigError};
pub use dashboard::{Dashboard, DashboardStats, Notice, SaleCompleted};
pub use fixtures::{Fixture, FixtureError};
pub use timers::{TimerId, Timers};
