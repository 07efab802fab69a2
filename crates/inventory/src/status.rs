//! Status rules.
//!
//! There are two rules and they disagree on purpose:
//!
//! - [`derive_status`] is the full rule. It checks expiry first, then stock
//!   against half and all of `min_stock` (strict comparisons). It runs when
//!   products are loaded and on an explicit refresh.
//! - [`sale_status`] runs after a checkout deducts stock. It ignores expiry
//!   and uses non-strict bounds (`<= 0`, `<= min_stock`).
//!
//! Consequences callers can observe: selling from an expired product reports
//! a stock status afterwards, and stock exactly at `min_stock` is `Ok` under
//! the full rule but `Low` after a sale.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::product::ProductStatus;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `expiry` (taken at 00:00 UTC), rounded up.
///
/// A product expiring today reports 0 until a full day has passed.
pub fn days_until_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry_at = expiry.and_time(NaiveTime::MIN).and_utc();
    let millis = (expiry_at - now).num_milliseconds();
    // ceil(millis / day) for a positive divisor.
    -((-millis).div_euclid(MILLIS_PER_DAY))
}

/// Full status rule. First match wins: expired, out of stock, under half of
/// the minimum, under the minimum, ok.
pub fn derive_status(
    stock: i64,
    min_stock: i64,
    expiry: NaiveDate,
    now: DateTime<Utc>,
) -> ProductStatus {
    if days_until_expiry(expiry, now) < 0 {
        return ProductStatus::Expired;
    }
    if stock == 0 {
        return ProductStatus::Critical;
    }
    // stock < min_stock * 0.5, kept in integers.
    if 2 * stock < min_stock {
        return ProductStatus::Critical;
    }
    if stock < min_stock {
        return ProductStatus::Low;
    }
    ProductStatus::Ok
}

/// Post-checkout status rule. Stock only; expiry is not consulted.
pub fn sale_status(new_stock: i64, min_stock: i64) -> ProductStatus {
    if new_stock <= 0 {
        ProductStatus::Critical
    } else if new_stock <= min_stock {
        ProductStatus::Low
    } else {
        ProductStatus::Ok
    }
}
