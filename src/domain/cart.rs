use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One catalog product plus quantity inside a cart.
///
/// `name`, `unit_price` and the kitchen fields are denormalized at
/// add-time so the cart stays renderable even if the catalog entry
/// changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub item_id: String,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub image: Option<String>,
}

impl LineItem {
    /// Two line items are the same cart entry only when both `item_id`
    /// and `kitchen_id` match. Items with the same id from different
    /// kitchens are distinct entries.
    pub fn same_entry(&self, item_id: &str, kitchen_id: Uuid) -> bool {
        self.item_id == item_id && self.kitchen_id == kitchen_id
    }
}

/// The per-user cart. At most one exists per `user_id`; it is created
/// lazily on first access and cleared (never deleted) after checkout.
#[derive(Debug, Clone)]
pub struct CartView {
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    pub coupon_code: String,
    pub discount: BigDecimal,
    /// Optimistic-concurrency token, bumped on every mutation.
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}
