use bigdecimal::{BigDecimal, RoundingMode};

use super::cart::LineItem;

/// Pricing constants. Global for now; a per-kitchen/per-region scheme
/// would hang off the catalog instead.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Tax as a fraction of the subtotal.
    pub tax_rate: BigDecimal,
    /// Flat fee charged on every order regardless of size.
    pub delivery_fee: BigDecimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            // 5% tax, 30 flat delivery fee.
            tax_rate: BigDecimal::from(5) / BigDecimal::from(100),
            delivery_fee: BigDecimal::from(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount: BigDecimal,
    pub final_amount: BigDecimal,
}

/// Round every monetary figure to 2 decimal places, half-up.
fn round2(value: BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Compute order totals from a set of line items and a discount.
///
/// `final_amount = subtotal + tax + delivery_fee - discount`, clamped
/// at zero when the discount exceeds everything else. The delivery fee
/// is charged even on an empty item list; callers that consider that a
/// defect must reject empty input before pricing (checkout does).
pub fn compute_totals(items: &[LineItem], discount: &BigDecimal, cfg: &PricingConfig) -> Totals {
    let subtotal = items.iter().fold(BigDecimal::from(0), |acc, item| {
        acc + &item.unit_price * BigDecimal::from(item.quantity)
    });
    let subtotal = round2(subtotal);
    let tax = round2(&subtotal * &cfg.tax_rate);
    let delivery_fee = round2(cfg.delivery_fee.clone());
    let discount = round2(discount.clone());

    let final_amount = &subtotal + &tax + &delivery_fee - &discount;
    let final_amount = if final_amount < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        round2(final_amount)
    };

    Totals {
        subtotal,
        tax,
        delivery_fee,
        discount,
        final_amount,
    }
}
