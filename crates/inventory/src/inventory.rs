use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmacontrol_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ProductId};
use farmacontrol_events::Event;

use crate::product::{Product, ProductStatus};
use crate::status::{derive_status, sale_status};

/// What checkout does when a line asks for more units than are on hand.
///
/// Cart merges do not re-check stock, so a line can exceed it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockPolicy {
    /// Deduct anyway; stock may go negative.
    #[default]
    AllowNegative,
    /// Deduct, flooring stock at zero.
    Clamp,
    /// Refuse the whole deduction.
    Reject,
}

impl core::str::FromStr for StockPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow-negative" => Ok(StockPolicy::AllowNegative),
            "clamp" => Ok(StockPolicy::Clamp),
            "reject" => Ok(StockPolicy::Reject),
            other => Err(DomainError::validation(format!("unknown stock policy '{other}'"))),
        }
    }
}

/// Units of one product leaving stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Command: DeductStock (checkout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductStock {
    pub movements: Vec<StockMovement>,
    pub policy: StockPolicy,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RefreshStatuses (re-run the full status rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStatuses {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    DeductStock(DeductStock),
    RefreshStatuses(RefreshStatuses),
}

/// Event: StockDeducted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDeducted {
    pub product_id: ProductId,
    pub quantity: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub status: ProductStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusRefreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRefreshed {
    pub product_id: ProductId,
    pub previous: ProductStatus,
    pub status: ProductStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockDeducted(StockDeducted),
    StatusRefreshed(StatusRefreshed),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockDeducted(_) => "inventory.product.stock_deducted",
            InventoryEvent::StatusRefreshed(_) => "inventory.product.status_refreshed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockDeducted(e) => e.occurred_at,
            InventoryEvent::StatusRefreshed(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: the product catalog with live stock.
///
/// Catalog order is the seed order and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    version: u64,
}

impl Inventory {
    /// Build the catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, p) in products.iter().enumerate() {
            if index.insert(p.id_typed().clone(), pos).is_some() {
                return Err(DomainError::invariant(format!(
                    "duplicate product id {}",
                    p.id_typed()
                )));
            }
        }
        Ok(Self {
            products,
            index,
            version: 0,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn require(&self, id: &ProductId) -> DomainResult<&Product> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        match self.index.get(id) {
            Some(&pos) => self.products.get_mut(pos),
            None => None,
        }
    }
}

impl AggregateRoot for Inventory {
    // One catalog per process.
    type Id = ();

    fn id(&self) -> &Self::Id {
        &()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::StockDeducted(e) => {
                if let Some(p) = self.get_mut(&e.product_id) {
                    p.set_stock(e.new_stock, e.status);
                }
            }
            InventoryEvent::StatusRefreshed(e) => {
                if let Some(p) = self.get_mut(&e.product_id) {
                    p.set_status(e.status);
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::DeductStock(cmd) => self.handle_deduct(cmd),
            InventoryCommand::RefreshStatuses(cmd) => Ok(self.handle_refresh(cmd)),
        }
    }
}

impl Inventory {
    fn handle_deduct(&self, cmd: &DeductStock) -> Result<Vec<InventoryEvent>, DomainError> {
        if cmd.movements.is_empty() {
            return Err(DomainError::validation("nothing to deduct"));
        }

        // Sum per product, keeping first-seen order.
        let mut totals: Vec<(&ProductId, i64)> = Vec::new();
        for m in &cmd.movements {
            if m.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "quantity for {} must be positive",
                    m.product_id
                )));
            }
            self.require(&m.product_id)?;
            match totals.iter_mut().find(|(id, _)| *id == &m.product_id) {
                Some((_, q)) => {
                    *q = q.checked_add(m.quantity).ok_or_else(|| {
                        DomainError::invariant(format!("quantity overflow for {}", m.product_id))
                    })?;
                }
                None => totals.push((&m.product_id, m.quantity)),
            }
        }

        let mut events = Vec::with_capacity(totals.len());
        for (id, quantity) in totals {
            let product = self.require(id)?;
            let previous_stock = product.stock();
            let raw = previous_stock.checked_sub(quantity).ok_or_else(|| {
                DomainError::invariant(format!("stock overflow for {id}"))
            })?;

            let new_stock = match cmd.policy {
                StockPolicy::AllowNegative => raw,
                StockPolicy::Clamp => raw.max(0),
                StockPolicy::Reject if raw < 0 => {
                    return Err(DomainError::invariant(format!(
                        "insufficient stock for {id}: {previous_stock} on hand, {quantity} requested"
                    )));
                }
                StockPolicy::Reject => raw,
            };

            events.push(InventoryEvent::StockDeducted(StockDeducted {
                product_id: id.clone(),
                quantity,
                previous_stock,
                new_stock,
                status: sale_status(new_stock, product.min_stock()),
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }

    fn handle_refresh(&self, cmd: &RefreshStatuses) -> Vec<InventoryEvent> {
        self.products
            .iter()
            .filter_map(|p| {
                let status = derive_status(p.stock(), p.min_stock(), p.expiry_date(), cmd.occurred_at);
                (status != p.status()).then(|| {
                    InventoryEvent::StatusRefreshed(StatusRefreshed {
                        product_id: p.id_typed().clone(),
                        previous: p.status(),
                        status,
                        occurred_at: cmd.occurred_at,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::{product, seed, today};
    use chrono::{Duration, NaiveDate};

    fn pid(id: &str) -> ProductId {
        ProductId::new(id).unwrap()
    }

    fn inventory() -> Inventory {
        Inventory::new(vec![
            product("p1", 450, 100),
            product("p2", 85, 100),
            product("p6", 45, 80),
        ])
        .unwrap()
    }

    fn deduct(lines: &[(&str, i64)], policy: StockPolicy) -> InventoryCommand {
        InventoryCommand::DeductStock(DeductStock {
            movements: lines
                .iter()
                .map(|(id, q)| StockMovement {
                    product_id: pid(id),
                    quantity: *q,
                })
                .collect(),
            policy,
            occurred_at: today(),
        })
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Inventory::new(vec![product("p1", 1, 1), product("p1", 2, 2)]).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn deduct_updates_stock_and_sale_status() {
        let mut inv = inventory();
        let events = inv.execute(&deduct(&[("p1", 2), ("p2", 10)], StockPolicy::AllowNegative)).unwrap();
        assert_eq!(events.len(), 2);

        let p1 = inv.get(&pid("p1")).unwrap();
        assert_eq!(p1.stock(), 448);
        assert_eq!(p1.status(), ProductStatus::Ok);

        let p2 = inv.get(&pid("p2")).unwrap();
        assert_eq!(p2.stock(), 75);
        assert_eq!(p2.status(), ProductStatus::Low);

        assert_eq!(inv.get(&pid("p6")).unwrap().stock(), 45);
        assert_eq!(inv.version(), 2);
    }

    #[test]
    fn oversell_goes_negative_under_default_policy() {
        let mut inv = inventory();
        inv.execute(&deduct(&[("p6", 50)], StockPolicy::default())).unwrap();
        let p6 = inv.get(&pid("p6")).unwrap();
        assert_eq!(p6.stock(), -5);
        assert_eq!(p6.status(), ProductStatus::Critical);
    }

    #[test]
    fn oversell_clamps_to_zero() {
        let mut inv = inventory();
        let events = inv.execute(&deduct(&[("p6", 50)], StockPolicy::Clamp)).unwrap();
        assert_eq!(inv.get(&pid("p6")).unwrap().stock(), 0);
        match &events[0] {
            InventoryEvent::StockDeducted(e) => {
                assert_eq!(e.quantity, 50);
                assert_eq!(e.previous_stock, 45);
                assert_eq!(e.status, ProductStatus::Critical);
            }
            _ => panic!("Expected StockDeducted event"),
        }
    }

    #[test]
    fn reject_policy_is_all_or_nothing() {
        let mut inv = inventory();
        let before = inv.clone();
        let err = inv
            .execute(&deduct(&[("p1", 5), ("p6", 50)], StockPolicy::Reject))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(inv, before);
    }

    #[test]
    fn unknown_product_leaves_stock_untouched() {
        let mut inv = inventory();
        let before = inv.clone();
        let err = inv
            .execute(&deduct(&[("p1", 1), ("nope", 1)], StockPolicy::AllowNegative))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(inv, before);
    }

    #[test]
    fn repeated_movements_are_summed() {
        let inv = inventory();
        let events = inv
            .handle(&deduct(&[("p1", 2), ("p2", 1), ("p1", 3)], StockPolicy::AllowNegative))
            .unwrap();
        assert_eq!(events.len(), 2);
        match &events[0] {
            InventoryEvent::StockDeducted(e) => {
                assert_eq!(e.product_id, pid("p1"));
                assert_eq!(e.quantity, 5);
                assert_eq!(e.new_stock, 445);
            }
            _ => panic!("Expected StockDeducted event"),
        }
    }

    #[test]
    fn sale_status_ignores_expiry() {
        let mut s = seed("old", 200, 50);
        s.expiry_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut inv = Inventory::new(vec![Product::from_seed(s, today())]).unwrap();
        assert_eq!(inv.products()[0].status(), ProductStatus::Expired);

        inv.execute(&deduct(&[("old", 1)], StockPolicy::AllowNegative)).unwrap();
        assert_eq!(inv.products()[0].status(), ProductStatus::Ok);
    }

    #[test]
    fn refresh_reapplies_full_rule() {
        let mut inv = inventory();
        // Sale rule marks stock == min as low; full rule says ok.
        inv.execute(&deduct(&[("p1", 350)], StockPolicy::AllowNegative)).unwrap();
        assert_eq!(inv.get(&pid("p1")).unwrap().status(), ProductStatus::Low);

        let events = inv
            .execute(&InventoryCommand::RefreshStatuses(RefreshStatuses { occurred_at: today() }))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(inv.get(&pid("p1")).unwrap().status(), ProductStatus::Ok);

        // Far in the future everything is expired.
        let later = today() + Duration::days(3650);
        inv.execute(&InventoryCommand::RefreshStatuses(RefreshStatuses { occurred_at: later }))
            .unwrap();
        assert!(inv.products().iter().all(|p| p.status() == ProductStatus::Expired));
    }

    #[test]
    fn overflowing_quantities_are_rejected_without_change() {
        let mut inv = inventory();
        let before = inv.clone();

        let err = inv
            .execute(&deduct(&[("p1", i64::MAX), ("p1", 1)], StockPolicy::AllowNegative))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        // 45 - i64::MAX is fine; -5 - i64::MAX is not.
        inv.execute(&deduct(&[("p6", 50)], StockPolicy::AllowNegative)).unwrap();
        let after_sale = inv.clone();
        assert!(inv.execute(&deduct(&[("p6", i64::MAX)], StockPolicy::AllowNegative)).is_err());
        assert_eq!(inv, after_sale);
        assert_ne!(inv, before);
    }

    #[test]
    fn status_refreshed_applies_the_recorded_status() {
        let mut inv = inventory();
        let version = inv.version();

        // The recorded status wins even where the full rule would disagree.
        inv.apply(&InventoryEvent::StatusRefreshed(StatusRefreshed {
            product_id: pid("p1"),
            previous: ProductStatus::Ok,
            status: ProductStatus::Critical,
            occurred_at: today(),
        }));

        let p1 = inv.get(&pid("p1")).unwrap();
        assert_eq!(p1.status(), ProductStatus::Critical);
        assert_eq!(p1.stock(), 450);
        assert_eq!(inv.version(), version + 1);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let inv = inventory();
        let before = inv.clone();
        let cmd = deduct(&[("p1", 2)], StockPolicy::AllowNegative);
        let e1 = inv.handle(&cmd).unwrap();
        let e2 = inv.handle(&cmd).unwrap();
        assert_eq!(inv, before);
        assert_eq!(e1, e2);
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("allow-negative".parse::<StockPolicy>().unwrap(), StockPolicy::AllowNegative);
        assert_eq!(" Clamp ".parse::<StockPolicy>().unwrap(), StockPolicy::Clamp);
        assert_eq!("reject".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert!("never".parse::<StockPolicy>().is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: post-stock = pre-stock - sum of quantities, others untouched.
            #[test]
            fn deduction_arithmetic(
                lines in proptest::collection::vec((0usize..3, 1i64..100), 1..8)
            ) {
                let ids = ["p1", "p2", "p6"];
                let mut inv = inventory();
                let before = inv.clone();

                let movements: Vec<(&str, i64)> =
                    lines.iter().map(|(i, q)| (ids[*i], *q)).collect();
                inv.execute(&deduct(&movements, StockPolicy::AllowNegative)).unwrap();

                for id in ids {
                    let sold: i64 = movements.iter().filter(|(m, _)| *m == id).map(|(_, q)| q).sum();
                    let pre = before.get(&pid(id)).unwrap().stock();
                    prop_assert_eq!(inv.get(&pid(id)).unwrap().stock(), pre - sold);
                }
            }
        }
    }
}
