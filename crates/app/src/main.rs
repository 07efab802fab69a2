use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use farmacontrol_app::{AppConfig, Dashboard, Fixture, Notice};
use farmacontrol_core::{Clock, ProductId, SystemClock};
use farmacontrol_inventory::{InventoryFilter, ProductStatus};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("reading FARMA_* configuration")?;
    farmacontrol_observability::init(config.log_format);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let fixture = Fixture::load_default(clock.now()).context("loading seed fixture")?;
    let mut dashboard = Dashboard::in_memory(fixture, config, clock);
    let notices = dashboard.subscribe();

    dashboard.set_filter(InventoryFilter::all().with_status(ProductStatus::Low));
    let low: Vec<&str> = dashboard.filtered_products().iter().map(|p| p.name()).collect();
    tracing::info!(products = ?low, "low stock");
    dashboard.set_filter(InventoryFilter::all());

    let paracetamol = ProductId::new("p1")?;
    dashboard.add_to_cart(&paracetamol, 2);
    tracing::info!(total = %dashboard.cart_total(), "cart");

    if let Some(sale) = dashboard.complete_sale(Instant::now()) {
        tracing::info!(total = %sale.total, lines = sale.lines.len(), "sale recorded");
    }

    dashboard.send_message("Tengo dolor de cabeza y fiebre", Instant::now());

    while let Some(deadline) = dashboard.next_deadline() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        dashboard.tick(Instant::now());
        for notice in notices.drain() {
            match notice {
                Notice::AssistantReplied { message_id } => {
                    if let Some(msg) = dashboard.conversation().last() {
                        tracing::info!(%message_id, reply = %msg.content, "assistant");
                    }
                }
                Notice::SaleCompleted(_) => {}
                Notice::SaleNoticeCleared => tracing::info!("sale notice cleared"),
            }
        }
    }

    for alert in dashboard.alerts() {
        tracing::info!(product = %alert.product_id, kind = ?alert.kind, "alert");
    }
    for report in dashboard.branch_report() {
        tracing::info!(
            branch = %report.branch_id,
            sales = report.sales_count,
            total = %report.total,
            average = %report.average_ticket(),
            "branch report"
        );
    }
    tracing::info!(stats = ?dashboard.stats(), "dashboard");

    Ok(())
}
