use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmacontrol_core::{Aggregate, AggregateRoot, DomainError, Money, ProductId, ValueObject};
use farmacontrol_events::Event;
use farmacontrol_inventory::StockMovement;

/// A product and quantity in the cart, with the name and unit price captured
/// when the product was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartLine {
    pub fn total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

impl ValueObject for CartLine {}

/// Aggregate root: the active shopping cart.
///
/// Lines keep insertion order and there is at most one line per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    version: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn line_for(&self, product_id: &ProductId) -> Option<(usize, &CartLine)> {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, l)| &l.product_id == product_id)
    }

    /// Stock movements a checkout of this cart would make.
    pub fn movements(&self) -> Vec<StockMovement> {
        self.lines
            .iter()
            .map(|l| StockMovement {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}

impl AggregateRoot for Cart {
    // One active cart per dashboard.
    type Id = ();

    fn id(&self) -> &Self::Id {
        &()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
///
/// `available_stock` is the product's stock at the time of the request; it
/// bounds a new line only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub available_stock: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLine {
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeQuantity {
    pub index: usize,
    pub delta: i64,
    pub available_stock: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveLine(RemoveLine),
    ChangeQuantity(ChangeQuantity),
    Checkout(Checkout),
}

/// Event: ItemAdded (new line appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineMerged (quantity added to an existing line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMerged {
    pub index: usize,
    pub product_id: ProductId,
    pub added: i64,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub index: usize,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub index: usize,
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CheckedOut. Carries the lines sold; applying it empties the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedOut {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    LineMerged(LineMerged),
    LineRemoved(LineRemoved),
    QuantityChanged(QuantityChanged),
    CheckedOut(CheckedOut),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "sales.cart.item_added",
            CartEvent::LineMerged(_) => "sales.cart.line_merged",
            CartEvent::LineRemoved(_) => "sales.cart.line_removed",
            CartEvent::QuantityChanged(_) => "sales.cart.quantity_changed",
            CartEvent::CheckedOut(_) => "sales.cart.checked_out",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::LineMerged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::CheckedOut(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.lines.push(e.line.clone());
            }
            CartEvent::LineMerged(e) => {
                if let Some(line) = self.lines.get_mut(e.index) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                if e.index < self.lines.len() {
                    self.lines.remove(e.index);
                }
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.lines.get_mut(e.index) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::CheckedOut(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveLine(cmd) => self.handle_remove(cmd),
            CartCommand::ChangeQuantity(cmd) => self.handle_change(cmd),
            CartCommand::Checkout(cmd) => self.handle_checkout(cmd),
        }
    }
}

impl Cart {
    fn line_at(&self, index: usize) -> Result<&CartLine, DomainError> {
        self.lines.get(index).ok_or_else(|| {
            DomainError::validation(format!(
                "line {index} out of range (cart has {} lines)",
                self.lines.len()
            ))
        })
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if cmd.quantity > cmd.available_stock {
            return Err(DomainError::invariant(format!(
                "quantity {} exceeds stock {} for {}",
                cmd.quantity, cmd.available_stock, cmd.product_id
            )));
        }

        // Merging does not re-check the combined quantity against stock.
        if let Some((index, line)) = self.line_for(&cmd.product_id) {
            let quantity = line.quantity.checked_add(cmd.quantity).ok_or_else(|| {
                DomainError::invariant(format!("quantity overflow for {}", cmd.product_id))
            })?;
            return Ok(vec![CartEvent::LineMerged(LineMerged {
                index,
                product_id: cmd.product_id.clone(),
                added: cmd.quantity,
                quantity,
                occurred_at: cmd.occurred_at,
            })]);
        }

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            line: CartLine {
                product_id: cmd.product_id.clone(),
                product_name: cmd.product_name.clone(),
                unit_price: cmd.unit_price,
                quantity: cmd.quantity,
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveLine) -> Result<Vec<CartEvent>, DomainError> {
        let line = self.line_at(cmd.index)?;
        Ok(vec![CartEvent::LineRemoved(LineRemoved {
            index: cmd.index,
            product_id: line.product_id.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change(&self, cmd: &ChangeQuantity) -> Result<Vec<CartEvent>, DomainError> {
        let line = self.line_at(cmd.index)?;
        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let quantity = line.quantity.checked_add(cmd.delta).ok_or_else(|| {
            DomainError::invariant(format!("quantity overflow for {}", line.product_id))
        })?;
        if quantity < 1 {
            return Err(DomainError::validation("quantity cannot drop below 1"));
        }
        if cmd.delta > 0 && quantity > cmd.available_stock {
            return Err(DomainError::invariant(format!(
                "quantity {quantity} exceeds stock {} for {}",
                cmd.available_stock, line.product_id
            )));
        }

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            index: cmd.index,
            product_id: line.product_id.clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_checkout(&self, cmd: &Checkout) -> Result<Vec<CartEvent>, DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("cart is empty"));
        }
        Ok(vec![CartEvent::CheckedOut(CheckedOut {
            lines: self.lines.clone(),
            total: self.total(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
