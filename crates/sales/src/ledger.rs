//! Recorded sales (read-only history seeded from the fixture).

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use farmacontrol_core::{BranchId, DomainError, DomainResult, Money, ProductId, SaleId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub branch_id: BranchId,
    pub lines: Vec<SaleLine>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub sold_by: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub has_prescription: bool,
}

impl Sale {
    /// Check that line totals and the sale total add up.
    pub fn validate(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::validation(format!("sale {} has no lines", self.id)));
        }
        for line in &self.lines {
            if line.quantity < 1 {
                return Err(DomainError::validation(format!(
                    "sale {}: quantity for {} must be positive",
                    self.id, line.product_id
                )));
            }
            if line.unit_price * line.quantity != line.total {
                return Err(DomainError::invariant(format!(
                    "sale {}: line total for {} is {}, expected {}",
                    self.id,
                    line.product_id,
                    line.total,
                    line.unit_price * line.quantity
                )));
            }
        }
        let sum: Money = self.lines.iter().map(|l| l.total).sum();
        if sum != self.total {
            return Err(DomainError::invariant(format!(
                "sale {}: total is {}, lines add up to {sum}",
                self.id, self.total
            )));
        }
        Ok(())
    }
}

/// Validated, ordered sale history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesLedger {
    sales: Vec<Sale>,
}

impl SalesLedger {
    pub fn new(sales: Vec<Sale>) -> DomainResult<Self> {
        for (i, sale) in sales.iter().enumerate() {
            sale.validate()?;
            if sales[..i].iter().any(|s| s.id == sale.id) {
                return Err(DomainError::invariant(format!("duplicate sale id {}", sale.id)));
            }
        }
        Ok(Self { sales })
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn total(&self) -> Money {
        self.sales.iter().map(|s| s.total).sum()
    }

    /// Revenue for a calendar day.
    pub fn total_on(&self, date: NaiveDate) -> Money {
        self.sales
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.total)
            .sum()
    }

    /// Revenue for the calendar month containing `date`.
    pub fn total_in_month(&self, date: NaiveDate) -> Money {
        self.sales
            .iter()
            .filter(|s| s.date.year() == date.year() && s.date.month() == date.month())
            .map(|s| s.total)
            .sum()
    }

    pub fn by_branch<'a>(&'a self, branch: &'a BranchId) -> impl Iterator<Item = &'a Sale> + 'a {
        self.sales.iter().filter(move |s| &s.branch_id == branch)
    }
}
