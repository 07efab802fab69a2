//! Inventory list filtering.

use serde::{Deserialize, Serialize};

use farmacontrol_core::BranchId;

use crate::product::{Product, ProductStatus};
use crate::search::fold;

/// Filter selection for the inventory list.
///
/// `None` selectors mean "all"; an empty (or blank) search matches everything.
/// The default filter is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFilter {
    pub search: String,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    pub branch: Option<BranchId>,
}

impl InventoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_branch(mut self, branch: BranchId) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty()
            && self.category.is_none()
            && self.status.is_none()
            && self.branch.is_none()
    }

    /// Does `product` pass every active selector?
    ///
    /// Search is case- and accent-insensitive over name, generic name and barcode.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_folded(product, &fold(&self.search))
    }

    /// Products passing the filter, in catalog order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = fold(&self.search);
        products
            .iter()
            .filter(|p| self.matches_folded(p, &needle))
            .collect()
    }

    fn matches_folded(&self, product: &Product, needle: &str) -> bool {
        if self.category.as_deref().is_some_and(|c| product.category() != c) {
            return false;
        }
        if self.status.is_some_and(|s| product.status() != s) {
            return false;
        }
        if self.branch.as_ref().is_some_and(|b| product.branch_id() != b) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        fold(product.name()).contains(needle)
            || fold(product.generic_name()).contains(needle)
            || product.barcode().contains(needle)
    }
}

/// Distinct categories in first-seen order, for the category selector.
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for p in products {
        if !out.contains(&p.category()) {
            out.push(p.category());
        }
    }
    out
}
