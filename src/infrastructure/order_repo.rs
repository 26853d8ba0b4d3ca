use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    OrderDraft, OrderItem, OrderStatus, OrderView, PaymentMethod, PaymentStatus,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::cart_repo;
use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(row: OrderRow, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
    // Stored enums were written by us; an unknown value is data
    // corruption, not caller error.
    let status = OrderStatus::parse(&row.status)
        .ok_or_else(|| DomainError::Internal(format!("unknown order status '{}'", row.status)))?;
    let payment_status = PaymentStatus::parse(&row.payment_status).ok_or_else(|| {
        DomainError::Internal(format!("unknown payment status '{}'", row.payment_status))
    })?;
    let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
        DomainError::Internal(format!("unknown payment method '{}'", row.payment_method))
    })?;
    let delivery_address = serde_json::from_value(row.delivery_address)
        .map_err(|e| DomainError::Internal(format!("bad delivery address: {e}")))?;

    Ok(OrderView {
        id: row.id,
        user_id: row.user_id,
        kitchen_id: row.kitchen_id,
        kitchen_name: row.kitchen_name,
        items: items
            .into_iter()
            .map(|item| OrderItem {
                item_id: item.item_id,
                name: item.name,
                unit_price: item.unit_price,
                quantity: item.quantity,
                image: item.image,
            })
            .collect(),
        total_amount: row.total_amount,
        tax: row.tax,
        delivery_fee: row.delivery_fee,
        discount: row.discount,
        final_amount: row.final_amount,
        status,
        payment_status,
        payment_method,
        delivery_address,
        estimated_delivery_time: row.estimated_delivery_time,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn load_items(conn: &mut PgConnection, row: &OrderRow) -> Result<Vec<OrderItemRow>, DomainError> {
    let items = OrderItemRow::belonging_to(row)
        .select(OrderItemRow::as_select())
        .order(order_items::created_at.asc())
        .load(conn)?;
    Ok(items)
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: OrderDraft, cart_version: i32) -> Result<OrderView, DomainError> {
        if draft.items.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            // Lock the cart and reset it first. The version check fails
            // the whole transaction when the cart was mutated after the
            // snapshot this draft was priced from, so a concurrently
            // added item can never be wiped without being ordered.
            cart_repo::clear_for_user(conn, draft.user_id, cart_version)?;

            let delivery_address = serde_json::to_value(&draft.delivery_address)
                .map_err(|e| DomainError::Internal(e.to_string()))?;

            let row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    user_id: draft.user_id,
                    kitchen_id: draft.kitchen_id,
                    kitchen_name: draft.kitchen_name,
                    total_amount: draft.total_amount,
                    tax: draft.tax,
                    delivery_fee: draft.delivery_fee,
                    discount: draft.discount,
                    final_amount: draft.final_amount,
                    status: OrderStatus::Pending.as_str().to_string(),
                    payment_status: PaymentStatus::Pending.as_str().to_string(),
                    payment_method: draft.payment_method.as_str().to_string(),
                    delivery_address,
                    estimated_delivery_time: draft.estimated_delivery_time,
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let new_items: Vec<NewOrderItemRow> = draft
                .items
                .into_iter()
                .map(|item| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id: row.id,
                    item_id: item.item_id,
                    name: item.name,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    image: item.image,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            let items = load_items(conn, &row)?;
            to_view(row, items)
        })
    }

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(order_id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &row)?;
        to_view(row, items).map(Some)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        let items = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .load(&mut conn)?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(items)
            .map(|(row, items)| to_view(row, items))
            .collect()
    }

    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = orders::table
                .find(order_id)
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Order"))?;

            let current = OrderStatus::parse(&row.status).ok_or_else(|| {
                DomainError::Internal(format!("unknown order status '{}'", row.status))
            })?;
            if !current.can_transition_to(status) {
                return Err(DomainError::Validation(format!(
                    "cannot move order from {current} to {status}"
                )));
            }

            let row = diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let items = load_items(conn, &row)?;
            to_view(row, items)
        })
    }
}
