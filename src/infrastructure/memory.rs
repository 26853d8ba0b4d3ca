use std::collections::HashMap;
use std::sync::Mutex;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::{CartView, LineItem};
use crate::domain::catalog::{KitchenView, PlanView};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderDraft, OrderStatus, OrderView, PaymentStatus};
use crate::domain::ports::{CartRepository, CatalogRepository, OrderRepository};

#[derive(Default)]
struct State {
    carts: HashMap<Uuid, CartView>,
    orders: HashMap<Uuid, OrderView>,
    kitchens: Vec<KitchenView>,
    plans: Vec<PlanView>,
}

/// In-memory implementation of every repository port: a keyed map from
/// user to cart plus append-only order storage behind one mutex.
///
/// Backs the unit and API tests and doubles as a reference for the
/// semantics the Diesel repositories must match.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_kitchen(&self, kitchen: KitchenView) {
        self.lock().kitchens.push(kitchen);
    }

    pub fn seed_plan(&self, plan: PlanView) {
        self.lock().plans.push(plan);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned mutex means a panicking test thread; propagating
        // the panic is the right behavior here.
        self.inner.lock().expect("in-memory store lock poisoned")
    }
}

fn empty_cart(user_id: Uuid) -> CartView {
    CartView {
        user_id,
        items: Vec::new(),
        coupon_code: String::new(),
        discount: BigDecimal::from(0),
        version: 0,
        updated_at: Utc::now(),
    }
}

fn check_version(cart: &CartView, expected: Option<i32>) -> Result<(), DomainError> {
    match expected {
        Some(v) if v != cart.version => Err(DomainError::Conflict),
        _ => Ok(()),
    }
}

fn touch(cart: &mut CartView) {
    cart.version += 1;
    cart.updated_at = Utc::now();
}

impl CartRepository for InMemoryStore {
    fn get_or_create(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state.carts.entry(user_id).or_insert_with(|| empty_cart(user_id));
        Ok(cart.clone())
    }

    fn add_item(
        &self,
        user_id: Uuid,
        line: LineItem,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state.carts.entry(user_id).or_insert_with(|| empty_cart(user_id));
        check_version(cart, expected_version)?;

        match cart
            .items
            .iter_mut()
            .find(|entry| entry.same_entry(&line.item_id, line.kitchen_id))
        {
            Some(entry) => entry.quantity += line.quantity,
            None => cart.items.push(line),
        }
        touch(cart);
        Ok(cart.clone())
    }

    fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i32,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state
            .carts
            .get_mut(&user_id)
            .ok_or(DomainError::NotFound("Cart"))?;
        check_version(cart, expected_version)?;

        let index = cart
            .items
            .iter()
            .position(|entry| entry.item_id == item_id)
            .ok_or(DomainError::NotFound("Item"))?;
        if quantity <= 0 {
            cart.items.remove(index);
        } else {
            cart.items[index].quantity = quantity;
        }
        touch(cart);
        Ok(cart.clone())
    }

    fn remove_item(&self, user_id: Uuid, item_id: &str) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state
            .carts
            .get_mut(&user_id)
            .ok_or(DomainError::NotFound("Cart"))?;
        cart.items.retain(|entry| entry.item_id != item_id);
        touch(cart);
        Ok(cart.clone())
    }

    fn set_coupon(
        &self,
        user_id: Uuid,
        code: &str,
        discount: BigDecimal,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state
            .carts
            .get_mut(&user_id)
            .ok_or(DomainError::NotFound("Cart"))?;
        check_version(cart, expected_version)?;

        cart.coupon_code = code.to_string();
        cart.discount = discount;
        touch(cart);
        Ok(cart.clone())
    }

    fn clear(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let mut state = self.lock();
        let cart = state.carts.entry(user_id).or_insert_with(|| empty_cart(user_id));
        cart.items.clear();
        cart.coupon_code.clear();
        cart.discount = BigDecimal::from(0);
        touch(cart);
        Ok(cart.clone())
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, draft: OrderDraft, cart_version: i32) -> Result<OrderView, DomainError> {
        if draft.items.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut state = self.lock();

        // Reset the cart first, failing the whole operation if it was
        // mutated after the snapshot the draft was priced from.
        {
            let cart = state
                .carts
                .get_mut(&draft.user_id)
                .ok_or(DomainError::Conflict)?;
            check_version(cart, Some(cart_version))?;
            cart.items.clear();
            cart.coupon_code.clear();
            cart.discount = BigDecimal::from(0);
            touch(cart);
        }

        let now = Utc::now();
        let order = OrderView {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            kitchen_id: draft.kitchen_id,
            kitchen_name: draft.kitchen_name,
            items: draft.items,
            total_amount: draft.total_amount,
            tax: draft.tax,
            delivery_fee: draft.delivery_fee,
            discount: draft.discount,
            final_amount: draft.final_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: draft.payment_method,
            delivery_address: draft.delivery_address,
            estimated_delivery_time: draft.estimated_delivery_time,
            created_at: now,
            updated_at: now,
        };
        state.orders.insert(order.id, order.clone());

        Ok(order)
    }

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock().orders.get(&order_id).cloned())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let state = self.lock();
        let mut orders: Vec<OrderView> = state
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError> {
        let mut state = self.lock();
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(DomainError::NotFound("Order"))?;
        if !order.status.can_transition_to(status) {
            return Err(DomainError::Validation(format!(
                "cannot move order from {} to {}",
                order.status, status
            )));
        }
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

impl CatalogRepository for InMemoryStore {
    fn list_kitchens(&self) -> Result<Vec<KitchenView>, DomainError> {
        let state = self.lock();
        let mut kitchens: Vec<KitchenView> = state
            .kitchens
            .iter()
            .filter(|k| k.is_active)
            .cloned()
            .collect();
        kitchens.sort_by(|a, b| b.rating.cmp(&a.rating));
        Ok(kitchens)
    }

    fn find_kitchen(&self, id: Uuid) -> Result<Option<KitchenView>, DomainError> {
        Ok(self.lock().kitchens.iter().find(|k| k.id == id).cloned())
    }

    fn list_plans(&self) -> Result<Vec<PlanView>, DomainError> {
        let state = self.lock();
        let mut plans: Vec<PlanView> = state.plans.iter().filter(|p| p.is_active).cloned().collect();
        plans.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(plans)
    }

    fn plans_by_kitchen(&self, kitchen_id: Uuid) -> Result<Vec<PlanView>, DomainError> {
        let state = self.lock();
        Ok(state
            .plans
            .iter()
            .filter(|p| p.kitchen_id == kitchen_id && p.is_active)
            .cloned()
            .collect())
    }
}
