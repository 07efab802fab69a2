//! Point-of-sale domain module.
//!
//! The shopping cart state machine, the recorded-sales ledger and per-branch
//! sales reporting. Deterministic domain logic only.

pub mod cart;
pub mod ledger;
pub mod report;

pub use cart::{
    AddItem, Cart, CartCommand, CartEvent, CartLine, ChangeQuantity, CheckedOut, Checkout,
    ItemAdded, LineMerged, LineRemoved, QuantityChanged, RemoveLine,
};
pub use ledger::{PaymentMethod, Sale, SaleLine, SalesLedger};
pub use report::{BranchSalesReport, report_by_branch};
