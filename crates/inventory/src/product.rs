use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use farmacontrol_core::{BranchId, Entity, Money, ProductId};

use crate::status::derive_status;

/// Stock health of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Ok,
    Low,
    Critical,
    Expired,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Ok => "ok",
            ProductStatus::Low => "low",
            ProductStatus::Critical => "critical",
            ProductStatus::Expired => "expired",
        }
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seed record for a product, as it appears in the fixture.
///
/// Carries no status: status is derived when the seed is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub id: ProductId,
    pub name: String,
    pub generic_name: String,
    pub category: String,
    pub manufacturer: String,
    pub barcode: String,
    pub price: Money,
    pub cost_price: Money,
    pub stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    pub expiry_date: NaiveDate,
    pub batch_number: String,
    pub branch_id: BranchId,
    pub requires_prescription: bool,
    pub uses: Vec<String>,
    pub dosage: String,
}

/// A catalog product held by one branch.
///
/// Stock and status only change through [`crate::Inventory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    generic_name: String,
    category: String,
    manufacturer: String,
    barcode: String,
    price: Money,
    cost_price: Money,
    stock: i64,
    min_stock: i64,
    max_stock: i64,
    expiry_date: NaiveDate,
    batch_number: String,
    branch_id: BranchId,
    status: ProductStatus,
    requires_prescription: bool,
    uses: Vec<String>,
    dosage: String,
}

impl Product {
    /// Load a seed record, deriving its status as of `now`.
    pub fn from_seed(seed: ProductSeed, now: DateTime<Utc>) -> Self {
        let status = derive_status(seed.stock, seed.min_stock, seed.expiry_date, now);
        Self {
            id: seed.id,
            name: seed.name,
            generic_name: seed.generic_name,
            category: seed.category,
            manufacturer: seed.manufacturer,
            barcode: seed.barcode,
            price: seed.price,
            cost_price: seed.cost_price,
            stock: seed.stock,
            min_stock: seed.min_stock,
            max_stock: seed.max_stock,
            expiry_date: seed.expiry_date,
            batch_number: seed.batch_number,
            branch_id: seed.branch_id,
            status,
            requires_prescription: seed.requires_prescription,
            uses: seed.uses,
            dosage: seed.dosage,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generic_name(&self) -> &str {
        &self.generic_name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    /// Gross margin per unit.
    pub fn unit_margin(&self) -> Money {
        self.price - self.cost_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }

    pub fn max_stock(&self) -> i64 {
        self.max_stock
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn batch_number(&self) -> &str {
        &self.batch_number
    }

    pub fn branch_id(&self) -> &BranchId {
        &self.branch_id
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn requires_prescription(&self) -> bool {
        self.requires_prescription
    }

    pub fn uses(&self) -> &[String] {
        &self.uses
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub(crate) fn set_stock(&mut self, stock: i64, status: ProductStatus) {
        self.stock = stock;
        self.status = status;
    }

    pub(crate) fn set_status(&mut self, status: ProductStatus) {
        self.status = status;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn status_is_derived_on_load() {
        assert_eq!(product("a", 450, 100).status(), ProductStatus::Ok);
        assert_eq!(product("b", 85, 100).status(), ProductStatus::Low);
        assert_eq!(product("c", 45, 100).status(), ProductStatus::Critical);
        assert_eq!(product("d", 0, 100).status(), ProductStatus::Critical);
    }

    #[test]
    fn expired_seed_loads_as_expired() {
        let mut s = seed("x", 500, 100);
        s.expiry_date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(Product::from_seed(s, today()).status(), ProductStatus::Expired);
    }

    #[test]
    fn margin_is_price_minus_cost() {
        assert_eq!(product("a", 1, 1).unit_margin(), Money::from_cents(450));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ProductStatus::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
