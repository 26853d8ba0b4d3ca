use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{DeliveryAddress, OrderDraft, OrderItem, OrderStatus, OrderView, PaymentMethod};
use crate::domain::ports::{CartRepository, OrderRepository};
use crate::domain::pricing::{compute_totals, PricingConfig};

const ESTIMATED_DELIVERY_MINUTES: i64 = 30;

/// Order use cases, including the one multi-store operation: checkout.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    pricing: PricingConfig,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            orders,
            carts,
            pricing,
        }
    }

    /// Converts the user's cart into an order.
    ///
    /// The stored cart is the authoritative pricing input: quantities,
    /// unit prices and the coupon discount all come from server-side
    /// state, never from the request. The order insert and the cart
    /// reset happen in one repository transaction, fenced on the
    /// version of the snapshot priced here: a cart mutated in between
    /// fails the checkout with `Conflict` instead of losing the write.
    pub fn checkout(
        &self,
        user_id: Uuid,
        delivery_address: DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderView, DomainError> {
        let cart = self.carts.get_or_create(user_id)?;
        if cart.items.is_empty() {
            return Err(DomainError::Validation(
                "cannot checkout an empty cart".to_string(),
            ));
        }

        let totals = compute_totals(&cart.items, &cart.discount, &self.pricing);

        // Single-kitchen orders: provenance comes from the first line.
        let kitchen_id = cart.items[0].kitchen_id;
        let kitchen_name = cart.items[0].kitchen_name.clone();

        let items = cart
            .items
            .iter()
            .map(|line| OrderItem {
                item_id: line.item_id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price.clone(),
                quantity: line.quantity,
                image: line.image.clone(),
            })
            .collect();

        let order = self.orders.create(
            OrderDraft {
                user_id,
                kitchen_id,
                kitchen_name,
                items,
                total_amount: totals.subtotal,
                tax: totals.tax,
                delivery_fee: totals.delivery_fee,
                discount: totals.discount,
                final_amount: totals.final_amount,
                delivery_address,
                payment_method,
                estimated_delivery_time: Utc::now()
                    + Duration::minutes(ESTIMATED_DELIVERY_MINUTES),
            },
            cart.version,
        )?;

        log::info!(
            "order {} placed by user {} (final amount {})",
            order.id,
            user_id,
            order.final_amount
        );
        Ok(order)
    }

    /// Fetch one order, enforcing ownership. A mismatched owner gets
    /// `Forbidden`, never `NotFound`, so "not yours" is distinguishable
    /// from "doesn't exist".
    pub fn get_order(&self, requester: Uuid, order_id: Uuid) -> Result<OrderView, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("Order"))?;
        if order.user_id != requester {
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    pub fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        self.orders.list_for_user(user_id)
    }

    /// Applies a status transition on behalf of `requester`. Like
    /// reads, only the order's owner may touch it; a mismatch is
    /// `Forbidden`.
    pub fn update_status(
        &self,
        requester: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("Order"))?;
        if order.user_id != requester {
            return Err(DomainError::Forbidden);
        }
        self.orders.update_status(order_id, status)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::cart_service::CartService;
    use crate::domain::cart::LineItem;
    use crate::infrastructure::memory::InMemoryStore;

    fn services() -> (CartService, OrderService) {
        let store = Arc::new(InMemoryStore::new());
        let carts = CartService::new(store.clone());
        let orders = OrderService::new(store.clone(), store, PricingConfig::default());
        (carts, orders)
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            street: "14 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip_code: "411001".to_string(),
            coordinates: None,
        }
    }

    fn line(item_id: &str, price: &str, quantity: i32, kitchen_id: Uuid) -> LineItem {
        LineItem {
            item_id: item_id.to_string(),
            name: format!("Dish {item_id}"),
            unit_price: dec(price),
            quantity,
            kitchen_id,
            kitchen_name: "Sharma Tiffins".to_string(),
            image: None,
        }
    }

    #[test]
    fn checkout_prices_the_cart_and_clears_it() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        let kitchen = Uuid::new_v4();
        carts
            .add_item(user, line("thali", "100", 2, kitchen), None)
            .expect("add");

        let order = orders
            .checkout(user, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        assert_eq!(order.total_amount, dec("200"));
        assert_eq!(order.tax, dec("10"));
        assert_eq!(order.delivery_fee, dec("30"));
        assert_eq!(order.final_amount, dec("240"));
        assert_eq!(order.kitchen_id, kitchen);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);

        let cart = carts.get_cart(user).expect("get");
        assert!(cart.items.is_empty());
        assert_eq!(cart.coupon_code, "");
        assert_eq!(cart.discount, dec("0"));
    }

    #[test]
    fn checkout_applies_the_cart_coupon_discount() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        carts
            .add_item(user, line("thali", "100", 2, Uuid::new_v4()), None)
            .expect("add");
        carts.apply_coupon(user, "SAVE20", None).expect("coupon");

        let order = orders
            .checkout(user, address(), PaymentMethod::Cash)
            .expect("checkout");

        assert_eq!(order.discount, dec("20"));
        assert_eq!(order.final_amount, dec("220"));
    }

    #[test]
    fn checkout_of_an_empty_cart_fails_and_creates_nothing() {
        let (_carts, orders) = services();
        let user = Uuid::new_v4();

        let err = orders
            .checkout(user, address(), PaymentMethod::Razorpay)
            .expect_err("empty cart");
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(orders.list_orders(user).expect("list").is_empty());
    }

    #[test]
    fn owner_reads_their_order_but_others_get_forbidden() {
        let (carts, orders) = services();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        carts
            .add_item(owner, line("thali", "100", 1, Uuid::new_v4()), None)
            .expect("add");
        let order = orders
            .checkout(owner, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        assert_eq!(orders.get_order(owner, order.id).expect("owner read").id, order.id);

        let err = orders
            .get_order(stranger, order.id)
            .expect_err("stranger read");
        // Forbidden, not NotFound: the order exists, it just isn't theirs.
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[test]
    fn missing_order_is_not_found() {
        let (_carts, orders) = services();
        let err = orders
            .get_order(Uuid::new_v4(), Uuid::new_v4())
            .expect_err("missing order");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn orders_are_listed_newest_first() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        let kitchen = Uuid::new_v4();

        let mut placed = Vec::new();
        for i in 0..3 {
            carts
                .add_item(user, line(&format!("dish-{i}"), "50", 1, kitchen), None)
                .expect("add");
            placed.push(orders.checkout(user, address(), PaymentMethod::Cash).expect("checkout").id);
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let listed = orders.list_orders(user).expect("list");
        assert_eq!(listed.len(), 3);
        let ids: Vec<Uuid> = listed.iter().map(|o| o.id).collect();
        placed.reverse();
        assert_eq!(ids, placed);
    }

    #[test]
    fn legal_status_transitions_are_applied() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        carts
            .add_item(user, line("thali", "100", 1, Uuid::new_v4()), None)
            .expect("add");
        let order = orders
            .checkout(user, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        let order = orders
            .update_status(user, order.id, OrderStatus::Confirmed)
            .expect("confirm");
        assert_eq!(order.status, OrderStatus::Confirmed);
        let order = orders
            .update_status(user, order.id, OrderStatus::Preparing)
            .expect("prepare");
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[test]
    fn illegal_status_transitions_are_rejected() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        carts
            .add_item(user, line("thali", "100", 1, Uuid::new_v4()), None)
            .expect("add");
        let order = orders
            .checkout(user, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        let err = orders
            .update_status(user, order.id, OrderStatus::Delivered)
            .expect_err("pending cannot jump to delivered");
        assert!(matches!(err, DomainError::Validation(_)));

        // The failed attempt must not have changed anything.
        let unchanged = orders.get_order(user, order.id).expect("read back");
        assert_eq!(unchanged.status, OrderStatus::Pending);
    }

    #[test]
    fn status_update_on_unknown_order_is_not_found() {
        let (_carts, orders) = services();
        let err = orders
            .update_status(Uuid::new_v4(), Uuid::new_v4(), OrderStatus::Confirmed)
            .expect_err("unknown order");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn cancelling_a_pending_order_is_legal() {
        let (carts, orders) = services();
        let user = Uuid::new_v4();
        carts
            .add_item(user, line("thali", "100", 1, Uuid::new_v4()), None)
            .expect("add");
        let order = orders
            .checkout(user, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        let order = orders
            .update_status(user, order.id, OrderStatus::Cancelled)
            .expect("cancel");
        assert_eq!(order.status, OrderStatus::Cancelled);

        let err = orders
            .update_status(user, order.id, OrderStatus::Confirmed)
            .expect_err("cancelled is terminal");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_the_owner_may_update_the_status() {
        let (carts, orders) = services();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        carts
            .add_item(owner, line("thali", "100", 1, Uuid::new_v4()), None)
            .expect("add");
        let order = orders
            .checkout(owner, address(), PaymentMethod::Razorpay)
            .expect("checkout");

        let err = orders
            .update_status(stranger, order.id, OrderStatus::Cancelled)
            .expect_err("stranger update");
        assert!(matches!(err, DomainError::Forbidden));

        let unchanged = orders.get_order(owner, order.id).expect("read back");
        assert_eq!(unchanged.status, OrderStatus::Pending);
    }

    #[test]
    fn an_order_insert_from_a_stale_cart_snapshot_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let user = Uuid::new_v4();
        let kitchen = Uuid::new_v4();

        store
            .add_item(user, line("thali", "100", 2, kitchen), None)
            .expect("add");
        let snapshot = store.get_or_create(user).expect("snapshot");

        // Another request lands between the snapshot and the insert.
        store
            .add_item(user, line("paneer", "90", 1, kitchen), None)
            .expect("interleaved add");

        let totals = compute_totals(&snapshot.items, &snapshot.discount, &PricingConfig::default());
        let draft = OrderDraft {
            user_id: user,
            kitchen_id: kitchen,
            kitchen_name: "Sharma Tiffins".to_string(),
            items: snapshot
                .items
                .iter()
                .map(|item| OrderItem {
                    item_id: item.item_id.clone(),
                    name: item.name.clone(),
                    unit_price: item.unit_price.clone(),
                    quantity: item.quantity,
                    image: item.image.clone(),
                })
                .collect(),
            total_amount: totals.subtotal,
            tax: totals.tax,
            delivery_fee: totals.delivery_fee,
            discount: totals.discount,
            final_amount: totals.final_amount,
            delivery_address: address(),
            payment_method: PaymentMethod::Razorpay,
            estimated_delivery_time: Utc::now() + Duration::minutes(30),
        };

        let err = store
            .create(draft, snapshot.version)
            .expect_err("stale snapshot");
        assert!(matches!(err, DomainError::Conflict));

        // Nothing was ordered and the interleaved item survived.
        assert!(store.list_for_user(user).expect("list").is_empty());
        let cart = store.get_or_create(user).expect("cart");
        assert_eq!(cart.items.len(), 2);
    }
}
