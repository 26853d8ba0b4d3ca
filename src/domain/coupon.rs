use bigdecimal::BigDecimal;

/// Resolve a coupon code to its fixed discount amount.
///
/// Matching is case-sensitive and exact. The table is static; coupons
/// have no expiry and no per-user limit. Applying a second coupon
/// replaces the first rather than stacking.
pub fn resolve(code: &str) -> Option<BigDecimal> {
    match code {
        "WELCOME10" => Some(BigDecimal::from(10)),
        "SAVE20" => Some(BigDecimal::from(20)),
        "FIRST50" => Some(BigDecimal::from(50)),
        _ => None,
    }
}
