//! Stock and expiry alerts for the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmacontrol_core::ProductId;

use crate::product::{Product, ProductStatus};
use crate::status::days_until_expiry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AlertKind {
    CriticalStock { stock: i64, min_stock: i64 },
    LowStock { stock: i64, min_stock: i64 },
    ExpiringSoon { days: i64 },
    Expired { days: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub product_name: String,
    pub kind: AlertKind,
}

/// Alerts for every product, in catalog order.
///
/// Stock alerts follow the product's current status. Expiry alerts are
/// computed fresh against `now`: expired, or expiring within `warning_days`.
/// One product can raise both a stock and an expiry alert.
pub fn alerts(products: &[Product], now: DateTime<Utc>, warning_days: i64) -> Vec<StockAlert> {
    let mut out = Vec::new();
    for p in products {
        let stock_alert = match p.status() {
            ProductStatus::Critical => Some(AlertKind::CriticalStock {
                stock: p.stock(),
                min_stock: p.min_stock(),
            }),
            ProductStatus::Low => Some(AlertKind::LowStock {
                stock: p.stock(),
                min_stock: p.min_stock(),
            }),
            ProductStatus::Ok | ProductStatus::Expired => None,
        };

        let days = days_until_expiry(p.expiry_date(), now);
        let expiry_alert = if days < 0 {
            Some(AlertKind::Expired { days })
        } else if days <= warning_days {
            Some(AlertKind::ExpiringSoon { days })
        } else {
            None
        };

        for kind in [stock_alert, expiry_alert].into_iter().flatten() {
            out.push(StockAlert {
                product_id: p.id_typed().clone(),
                product_name: p.name().to_string(),
                kind,
            });
        }
    }
    out
}
