use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Catalog reference data. Owned by an external administrative
/// process; this service only ever reads it.
#[derive(Debug, Clone)]
pub struct KitchenView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub rating: BigDecimal,
    pub total_ratings: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlanView {
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
