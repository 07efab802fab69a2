//! The dashboard store.
//!
//! Owns every piece of mutable state (catalog, cart, chat, pending timers)
//! and is the only thing that mutates it. Each operation runs to completion
//! synchronously. Aggregate commands are decided first and applied only if
//! every aggregate involved accepts them.
//!
//! Rejected user actions are no-ops: they return `false`/`None`, leave
//! state untouched and log at `debug`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use farmacontrol_assistant::{Conversation, Reply, answer};
use farmacontrol_core::{Aggregate, BranchId, Clock, MessageId, Money, ProductId};
use farmacontrol_directory::Directory;
use farmacontrol_events::{Event, EventBus, InMemoryEventBus, Subscription};
use farmacontrol_inventory::{
    AlertKind, DeductStock, Inventory, InventoryCommand, InventoryEvent, InventoryFilter, Product,
    ProductStatus, RefreshStatuses, StockAlert, StockDeducted, alerts, categories,
};
use farmacontrol_sales::{
    AddItem, BranchSalesReport, Cart, CartCommand, CartEvent, CartLine, ChangeQuantity, Checkout,
    RemoveLine, Sale, SalesLedger, report_by_branch,
};

use crate::config::AppConfig;
use crate::fixtures::Fixture;
use crate::timers::{TimerId, Timers};

/// Outcome of a completed sale, shown as a transient notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleCompleted {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub stock: Vec<StockDeducted>,
    pub occurred_at: DateTime<Utc>,
}

/// Messages for presentation-layer subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SaleCompleted(SaleCompleted),
    SaleNoticeCleared,
    AssistantReplied { message_id: MessageId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    /// Products whose status is low or critical.
    pub low_stock_products: usize,
    pub expiring_soon: usize,
    pub total_sales: Money,
    pub today_sales: Money,
    pub month_sales: Money,
    pub active_branches: usize,
    pub total_users: usize,
}

#[derive(Debug, Clone)]
enum Scheduled {
    AssistantReply(Reply),
    ClearSaleNotice,
}

pub struct Dashboard<B = Arc<InMemoryEventBus<Notice>>>
where
    B: EventBus<Notice>,
{
    inventory: Inventory,
    cart: Cart,
    ledger: SalesLedger,
    directory: Directory,
    conversation: Conversation,
    filter: InventoryFilter,
    sale_notice: Option<SaleCompleted>,
    sale_notice_timer: Option<TimerId>,
    timers: Timers<Scheduled>,
    config: AppConfig,
    clock: Arc<dyn Clock>,
    bus: B,
}

impl Dashboard<Arc<InMemoryEventBus<Notice>>> {
    /// Dashboard with its own in-memory notice bus.
    pub fn in_memory(fixture: Fixture, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(fixture, config, clock, Arc::new(InMemoryEventBus::new()))
    }
}

impl<B> Dashboard<B>
where
    B: EventBus<Notice>,
{
    pub fn new(fixture: Fixture, config: AppConfig, clock: Arc<dyn Clock>, bus: B) -> Self {
        let conversation = Conversation::new(clock.now());
        tracing::info!(
            products = fixture.inventory.len(),
            sales = fixture.ledger.len(),
            branches = fixture.directory.branches().len(),
            stock_policy = ?config.stock_policy,
            "dashboard ready"
        );
        Self {
            inventory: fixture.inventory,
            cart: Cart::new(),
            ledger: fixture.ledger,
            directory: fixture.directory,
            conversation,
            filter: InventoryFilter::default(),
            sale_notice: None,
            sale_notice_timer: None,
            timers: Timers::new(),
            config,
            clock,
            bus,
        }
    }

    pub fn subscribe(&self) -> Subscription<Notice> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn products(&self) -> &[Product] {
        self.inventory.products()
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.inventory.get(id)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_total(&self) -> Money {
        self.cart.total()
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_typing(&self) -> bool {
        self.conversation.is_typing()
    }

    pub fn sale_notice(&self) -> Option<&SaleCompleted> {
        self.sale_notice.as_ref()
    }

    // Inventory view.

    pub fn filter(&self) -> &InventoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: InventoryFilter) {
        self.filter = filter;
    }

    pub fn filtered_products(&self) -> Vec<&Product> {
        self.filter.apply(self.inventory.products())
    }

    pub fn categories(&self) -> Vec<&str> {
        categories(self.inventory.products())
    }

    // Cart.

    /// Add `quantity` units of a product to the cart, merging into its line.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        let Some(product) = self.inventory.get(product_id) else {
            tracing::debug!(%product_id, "add to cart ignored: unknown product");
            return false;
        };
        let cmd = CartCommand::AddItem(AddItem {
            product_id: product_id.clone(),
            product_name: product.name().to_string(),
            unit_price: product.price(),
            quantity,
            available_stock: product.stock(),
            occurred_at: self.clock.now(),
        });
        self.run_cart(cmd)
    }

    pub fn remove_line(&mut self, index: usize) -> bool {
        let cmd = CartCommand::RemoveLine(RemoveLine {
            index,
            occurred_at: self.clock.now(),
        });
        self.run_cart(cmd)
    }

    pub fn change_quantity(&mut self, index: usize, delta: i64) -> bool {
        let available_stock = self
            .cart
            .lines()
            .get(index)
            .and_then(|line| self.inventory.get(&line.product_id))
            .map_or(0, Product::stock);
        let cmd = CartCommand::ChangeQuantity(ChangeQuantity {
            index,
            delta,
            available_stock,
            occurred_at: self.clock.now(),
        });
        self.run_cart(cmd)
    }

    fn run_cart(&mut self, cmd: CartCommand) -> bool {
        match self.cart.execute(&cmd) {
            Ok(events) => {
                for e in &events {
                    tracing::trace!(event = e.event_type(), "cart updated");
                }
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "cart command ignored");
                false
            }
        }
    }

    // Sale.

    /// Check out the cart, deduct stock and raise the sale notice.
    ///
    /// The notice clears itself `config.sale_notice` after `now`; a newer sale
    /// replaces the pending clear. Returns `None` (no change) for an empty
    /// cart, or when the stock policy refuses the deduction.
    pub fn complete_sale(&mut self, now: Instant) -> Option<SaleCompleted> {
        let occurred_at = self.clock.now();

        let checkout = CartCommand::Checkout(Checkout { occurred_at });
        let cart_events = match self.cart.handle(&checkout) {
            Ok(events) => events,
            Err(err) => {
                tracing::debug!(error = %err, "sale completion ignored");
                return None;
            }
        };

        let deduct = InventoryCommand::DeductStock(DeductStock {
            movements: self.cart.movements(),
            policy: self.config.stock_policy,
            occurred_at,
        });
        let stock_events = match self.inventory.handle(&deduct) {
            Ok(events) => events,
            Err(err) => {
                tracing::debug!(error = %err, "sale completion refused by stock policy");
                return None;
            }
        };

        for event in &stock_events {
            self.inventory.apply(event);
            tracing::trace!(event = event.event_type(), "inventory updated");
        }
        for event in &cart_events {
            self.cart.apply(event);
            tracing::trace!(event = event.event_type(), "cart updated");
        }

        let (lines, total) = cart_events
            .into_iter()
            .find_map(|e| match e {
                CartEvent::CheckedOut(c) => Some((c.lines, c.total)),
                _ => None,
            })
            .unwrap_or_default();
        let stock: Vec<StockDeducted> = stock_events
            .into_iter()
            .filter_map(|e| match e {
                InventoryEvent::StockDeducted(d) => Some(d),
                InventoryEvent::StatusRefreshed(_) => None,
            })
            .collect();

        for d in stock.iter().filter(|d| d.new_stock < 0) {
            tracing::warn!(
                product_id = %d.product_id,
                stock = d.new_stock,
                "stock went negative"
            );
        }
        tracing::info!(lines = lines.len(), total = %total, "sale completed");

        let sale = SaleCompleted {
            lines,
            total,
            stock,
            occurred_at,
        };

        if let Some(previous) = self.sale_notice_timer.take() {
            self.timers.cancel(previous);
        }
        self.sale_notice = Some(sale.clone());
        self.sale_notice_timer = Some(
            self.timers
                .schedule(now + self.config.sale_notice, Scheduled::ClearSaleNotice),
        );
        self.publish(Notice::SaleCompleted(sale.clone()));

        Some(sale)
    }

    // Assistant.

    /// Post a user message; the reply arrives `config.assistant_delay` after
    /// `now`. Blank input is ignored.
    pub fn send_message(&mut self, text: &str, now: Instant) -> Option<MessageId> {
        let reply = match answer(text, self.inventory.products()) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(error = %err, "assistant message ignored");
                return None;
            }
        };
        let id = self.conversation.push_user(text, self.clock.now())?.id;
        tracing::debug!(
            message_id = %id,
            suggestions = reply.products.len(),
            "assistant reply scheduled"
        );
        self.timers
            .schedule(now + self.config.assistant_delay, Scheduled::AssistantReply(reply));
        Some(id)
    }

    // Time.

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Fire every timer due at `now`. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.timers.take_due(now);
        let fired = due.len();
        for scheduled in due {
            match scheduled {
                Scheduled::AssistantReply(reply) => {
                    let message_id = self.conversation.push_reply(reply, self.clock.now()).id;
                    self.publish(Notice::AssistantReplied { message_id });
                }
                Scheduled::ClearSaleNotice => {
                    self.sale_notice = None;
                    self.sale_notice_timer = None;
                    self.publish(Notice::SaleNoticeCleared);
                }
            }
        }
        fired
    }

    /// Re-run the full status rule against the current date.
    ///
    /// Returns how many products changed status.
    pub fn refresh_statuses(&mut self) -> usize {
        let cmd = InventoryCommand::RefreshStatuses(RefreshStatuses {
            occurred_at: self.clock.now(),
        });
        match self.inventory.execute(&cmd) {
            Ok(events) => events.len(),
            Err(err) => {
                tracing::debug!(error = %err, "status refresh failed");
                0
            }
        }
    }

    // Reports.

    pub fn alerts(&self) -> Vec<StockAlert> {
        alerts(
            self.inventory.products(),
            self.clock.now(),
            self.config.expiry_warning_days,
        )
    }

    pub fn stats(&self) -> DashboardStats {
        let now = self.clock.now();
        let products = self.inventory.products();
        let expiring_soon = self
            .alerts()
            .iter()
            .filter(|a| matches!(a.kind, AlertKind::ExpiringSoon { .. }))
            .count();

        DashboardStats {
            total_products: products.len(),
            low_stock_products: products
                .iter()
                .filter(|p| matches!(p.status(), ProductStatus::Low | ProductStatus::Critical))
                .count(),
            expiring_soon,
            total_sales: self.ledger.total(),
            today_sales: self.ledger.total_on(now.date_naive()),
            month_sales: self.ledger.total_in_month(now.date_naive()),
            active_branches: self.directory.active_branches().count(),
            total_users: self.directory.users().len(),
        }
    }

    /// Recorded sales for one branch, in ledger order.
    pub fn branch_sales<'a>(&'a self, branch: &'a BranchId) -> Vec<&'a Sale> {
        self.ledger.by_branch(branch).collect()
    }

    pub fn branch_report(&self) -> Vec<BranchSalesReport> {
        report_by_branch(self.ledger.sales())
    }

    fn publish(&self, notice: Notice) {
        if let Err(err) = self.bus.publish(notice) {
            tracing::warn!(error = ?err, "failed to publish notice");
        }
    }
}
