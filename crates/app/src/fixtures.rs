//! Seed data loaded once at startup.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use farmacontrol_core::DomainError;
use farmacontrol_directory::{Branch, Directory, User};
use farmacontrol_inventory::{Inventory, Product, ProductSeed};
use farmacontrol_sales::{Sale, SalesLedger};

/// The demo catalog, sales, branches and staff.
pub const DEFAULT_SEED: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inconsistent fixture: {0}")]
    Domain(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
    products: Vec<ProductSeed>,
    sales: Vec<Sale>,
    branches: Vec<Branch>,
    users: Vec<User>,
}

/// Validated starting state for a [`crate::Dashboard`].
#[derive(Debug, Clone)]
pub struct Fixture {
    pub inventory: Inventory,
    pub ledger: SalesLedger,
    pub directory: Directory,
}

impl Fixture {
    pub fn load_default(now: DateTime<Utc>) -> Result<Self, FixtureError> {
        Self::from_json(DEFAULT_SEED, now)
    }

    /// Parse and validate a seed document.
    ///
    /// Product statuses are derived as of `now`. Products and sales must
    /// reference known branches, and sales known sellers.
    pub fn from_json(json: &str, now: DateTime<Utc>) -> Result<Self, FixtureError> {
        let doc: SeedDocument = serde_json::from_str(json)?;
        let directory = Directory::new(doc.branches, doc.users)?;

        for seed in &doc.products {
            if directory.branch(&seed.branch_id).is_none() {
                return Err(DomainError::not_found(format!(
                    "branch {} for product {}",
                    seed.branch_id, seed.id
                ))
                .into());
            }
        }
        for sale in &doc.sales {
            if directory.branch(&sale.branch_id).is_none() {
                return Err(DomainError::not_found(format!(
                    "branch {} for sale {}",
                    sale.branch_id, sale.id
                ))
                .into());
            }
            if directory.user(&sale.sold_by).is_none() {
                return Err(DomainError::not_found(format!(
                    "seller {} for sale {}",
                    sale.sold_by, sale.id
                ))
                .into());
            }
        }

        let products = doc
            .products
            .into_iter()
            .map(|seed| Product::from_seed(seed, now))
            .collect();

        Ok(Self {
            inventory: Inventory::new(products)?,
            ledger: SalesLedger::new(doc.sales)?,
            directory,
        })
    }
}
