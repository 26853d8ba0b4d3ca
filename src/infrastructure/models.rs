use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{cart_items, carts, kitchens, order_items, orders, plans};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coupon_code: String,
    pub discount: BigDecimal,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = carts)]
pub struct NewCartRow {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = cart_items)]
#[diesel(belongs_to(CartRow, foreign_key = cart_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub item_id: String,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub item_id: String,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub total_amount: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount: BigDecimal,
    pub final_amount: BigDecimal,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub delivery_address: Value,
    pub estimated_delivery_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub total_amount: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount: BigDecimal,
    pub final_amount: BigDecimal,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub delivery_address: Value,
    pub estimated_delivery_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: String,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: String,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = kitchens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KitchenRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub rating: BigDecimal,
    pub total_ratings: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = plans)]
#[diesel(belongs_to(KitchenRow, foreign_key = kitchen_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanRow {
    pub id: Uuid,
    pub kitchen_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub duration_days: i32,
    pub meals_per_day: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
