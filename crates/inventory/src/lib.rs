//! Inventory domain module.
//!
//! Products with mutable stock and a derived status, the stock-deduction
//! state machine used at checkout, and the stateless views over the catalog
//! (filters and alerts). No IO.

pub mod alerts;
pub mod filter;
pub mod inventory;
pub mod product;
pub mod search;
pub mod status;

pub use alerts::{AlertKind, StockAlert, alerts};
pub use filter::{InventoryFilter, categories};
pub use inventory::{
    DeductStock, Inventory, InventoryCommand, InventoryEvent, RefreshStatuses, StatusRefreshed,
    StockDeducted, StockMovement, StockPolicy,
};
pub use product::{Product, ProductSeed, ProductStatus};
pub use search::fold;
pub use status::{days_until_expiry, derive_status, sale_status};
