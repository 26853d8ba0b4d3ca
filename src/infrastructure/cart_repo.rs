use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartView, LineItem};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, carts};

use super::models::{CartItemRow, CartRow, NewCartItemRow, NewCartRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_row_locked(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<CartRow>, DomainError> {
    // Row lock serializes the read-modify-write against concurrent
    // mutations of the same cart; the version check then rejects stale
    // client reads.
    let row = carts::table
        .filter(carts::user_id.eq(user_id))
        .select(CartRow::as_select())
        .for_update()
        .first(conn)
        .optional()?;
    Ok(row)
}

fn get_or_create_row(conn: &mut PgConnection, user_id: Uuid) -> Result<CartRow, DomainError> {
    if let Some(row) = find_row_locked(conn, user_id)? {
        return Ok(row);
    }
    let row = diesel::insert_into(carts::table)
        .values(&NewCartRow {
            id: Uuid::new_v4(),
            user_id,
        })
        .returning(CartRow::as_returning())
        .get_result(conn)?;
    Ok(row)
}

fn check_version(row: &CartRow, expected: Option<i32>) -> Result<(), DomainError> {
    match expected {
        Some(v) if v != row.version => Err(DomainError::Conflict),
        _ => Ok(()),
    }
}

fn bump(conn: &mut PgConnection, cart_id: Uuid) -> Result<(), DomainError> {
    diesel::update(carts::table.find(cart_id))
        .set((
            carts::version.eq(carts::version + 1),
            carts::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    Ok(())
}

fn load_view(conn: &mut PgConnection, cart_id: Uuid) -> Result<CartView, DomainError> {
    let row = carts::table
        .find(cart_id)
        .select(CartRow::as_select())
        .first(conn)?;
    let items = CartItemRow::belonging_to(&row)
        .select(CartItemRow::as_select())
        .order(cart_items::created_at.asc())
        .load(conn)?;
    Ok(CartView {
        user_id: row.user_id,
        items: items
            .into_iter()
            .map(|item| LineItem {
                item_id: item.item_id,
                name: item.name,
                unit_price: item.unit_price,
                quantity: item.quantity,
                kitchen_id: item.kitchen_id,
                kitchen_name: item.kitchen_name,
                image: item.image,
            })
            .collect(),
        coupon_code: row.coupon_code,
        discount: row.discount,
        version: row.version,
        updated_at: row.updated_at,
    })
}

fn reset_row(conn: &mut PgConnection, cart_id: Uuid) -> Result<(), DomainError> {
    diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id))).execute(conn)?;
    diesel::update(carts::table.find(cart_id))
        .set((
            carts::coupon_code.eq(""),
            carts::discount.eq(BigDecimal::from(0)),
            carts::version.eq(carts::version + 1),
            carts::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    Ok(())
}

/// Resets the cart belonging to `user_id`, after checking that it is
/// still at the version the caller read. Runs inside the caller's
/// transaction; the order repository shares this with the checkout
/// path, where the check rejects carts mutated after the priced
/// snapshot was taken.
pub(super) fn clear_for_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    expected_version: i32,
) -> Result<(), DomainError> {
    let row = find_row_locked(conn, user_id)?.ok_or(DomainError::Conflict)?;
    check_version(&row, Some(expected_version))?;
    reset_row(conn, row.id)
}

impl CartRepository for DieselCartRepository {
    fn get_or_create(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = get_or_create_row(conn, user_id)?;
            load_view(conn, row.id)
        })
    }

    fn add_item(
        &self,
        user_id: Uuid,
        line: LineItem,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = get_or_create_row(conn, user_id)?;
            check_version(&row, expected_version)?;

            let existing = cart_items::table
                .filter(cart_items::cart_id.eq(row.id))
                .filter(cart_items::item_id.eq(&line.item_id))
                .filter(cart_items::kitchen_id.eq(line.kitchen_id))
                .select(CartItemRow::as_select())
                .first(conn)
                .optional()?;

            match existing {
                Some(item) => {
                    diesel::update(cart_items::table.find(item.id))
                        .set(cart_items::quantity.eq(cart_items::quantity + line.quantity))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(cart_items::table)
                        .values(&NewCartItemRow {
                            id: Uuid::new_v4(),
                            cart_id: row.id,
                            item_id: line.item_id,
                            name: line.name,
                            unit_price: line.unit_price,
                            quantity: line.quantity,
                            kitchen_id: line.kitchen_id,
                            kitchen_name: line.kitchen_name,
                            image: line.image,
                        })
                        .execute(conn)?;
                }
            }

            bump(conn, row.id)?;
            load_view(conn, row.id)
        })
    }

    fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i32,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = find_row_locked(conn, user_id)?.ok_or(DomainError::NotFound("Cart"))?;
            check_version(&row, expected_version)?;

            let item = cart_items::table
                .filter(cart_items::cart_id.eq(row.id))
                .filter(cart_items::item_id.eq(item_id))
                .select(CartItemRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Item"))?;

            if quantity <= 0 {
                diesel::delete(cart_items::table.find(item.id)).execute(conn)?;
            } else {
                diesel::update(cart_items::table.find(item.id))
                    .set(cart_items::quantity.eq(quantity))
                    .execute(conn)?;
            }

            bump(conn, row.id)?;
            load_view(conn, row.id)
        })
    }

    fn remove_item(&self, user_id: Uuid, item_id: &str) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = find_row_locked(conn, user_id)?.ok_or(DomainError::NotFound("Cart"))?;

            // Deleting an absent item is a no-op by design.
            diesel::delete(
                cart_items::table
                    .filter(cart_items::cart_id.eq(row.id))
                    .filter(cart_items::item_id.eq(item_id)),
            )
            .execute(conn)?;

            bump(conn, row.id)?;
            load_view(conn, row.id)
        })
    }

    fn set_coupon(
        &self,
        user_id: Uuid,
        code: &str,
        discount: BigDecimal,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = find_row_locked(conn, user_id)?.ok_or(DomainError::NotFound("Cart"))?;
            check_version(&row, expected_version)?;

            diesel::update(carts::table.find(row.id))
                .set((
                    carts::coupon_code.eq(code),
                    carts::discount.eq(discount),
                    carts::version.eq(carts::version + 1),
                    carts::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            load_view(conn, row.id)
        })
    }

    fn clear(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = get_or_create_row(conn, user_id)?;
            reset_row(conn, row.id)?;
            load_view(conn, row.id)
        })
    }
}
