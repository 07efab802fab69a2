//! Per-branch sales reporting.

use serde::{Deserialize, Serialize};

use farmacontrol_core::{BranchId, Money};

use crate::ledger::{PaymentMethod, Sale};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSalesReport {
    pub branch_id: BranchId,
    pub sales_count: usize,
    pub units_sold: i64,
    pub total: Money,
    pub prescription_sales: usize,
    /// Revenue per payment method, in first-seen order.
    pub by_payment_method: Vec<(PaymentMethod, Money)>,
}

impl BranchSalesReport {
    fn empty(branch_id: BranchId) -> Self {
        Self {
            branch_id,
            sales_count: 0,
            units_sold: 0,
            total: Money::ZERO,
            prescription_sales: 0,
            by_payment_method: Vec::new(),
        }
    }

    fn record(&mut self, sale: &Sale) {
        self.sales_count += 1;
        self.units_sold += sale.lines.iter().map(|l| l.quantity).sum::<i64>();
        self.total += sale.total;
        if sale.has_prescription {
            self.prescription_sales += 1;
        }
        match self
            .by_payment_method
            .iter_mut()
            .find(|(m, _)| *m == sale.payment_method)
        {
            Some((_, amount)) => *amount += sale.total,
            None => self.by_payment_method.push((sale.payment_method, sale.total)),
        }
    }

    /// Average ticket, rounded down to the centavo.
    pub fn average_ticket(&self) -> Money {
        match self.sales_count {
            0 => Money::ZERO,
            n => Money::from_cents(self.total.cents() / n as i64),
        }
    }
}

/// One report per branch that has sales, in order of first sale.
pub fn report_by_branch(sales: &[Sale]) -> Vec<BranchSalesReport> {
    let mut reports: Vec<BranchSalesReport> = Vec::new();
    for sale in sales {
        let pos = match reports.iter().position(|r| r.branch_id == sale.branch_id) {
            Some(pos) => pos,
            None => {
                reports.push(BranchSalesReport::empty(sale.branch_id.clone()));
                reports.len() - 1
            }
        };
        reports[pos].record(sale);
    }
    reports
}
