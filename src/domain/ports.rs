use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::{CartView, LineItem};
use super::catalog::{KitchenView, PlanView};
use super::errors::DomainError;
use super::order::{OrderDraft, OrderStatus, OrderView};

/// Owns the single mutable cart per user.
///
/// Mutations that take `expected_version` perform a compare-and-swap
/// against the cart's current version and fail with
/// `DomainError::Conflict` on a stale read. Passing `None` skips the
/// check (last writer wins).
pub trait CartRepository: Send + Sync + 'static {
    /// Returns the user's cart, creating an empty one if none exists.
    fn get_or_create(&self, user_id: Uuid) -> Result<CartView, DomainError>;

    /// Merges `line` into the cart: an existing entry with the same
    /// `(item_id, kitchen_id)` has its quantity incremented, otherwise
    /// the line is appended.
    fn add_item(
        &self,
        user_id: Uuid,
        line: LineItem,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError>;

    /// Sets (not adds) the quantity of the entry matching `item_id`;
    /// a quantity of zero or less removes it. `NotFound` when the cart
    /// or the entry is missing.
    fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i32,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError>;

    /// Removes every entry matching `item_id`. Removing an absent item
    /// is a no-op, not an error; a missing cart is `NotFound`.
    fn remove_item(&self, user_id: Uuid, item_id: &str) -> Result<CartView, DomainError>;

    /// Persists an already-resolved coupon on the cart.
    fn set_coupon(
        &self,
        user_id: Uuid,
        code: &str,
        discount: BigDecimal,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError>;

    /// Resets items, coupon and discount. Idempotent.
    fn clear(&self, user_id: Uuid) -> Result<CartView, DomainError>;
}

/// Append-only order persistence plus status transitions.
pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the draft as a new pending order and clears the
    /// owner's cart within the same transaction, so a crash can never
    /// leave an order without the matching cart reset. `cart_version`
    /// is the version of the cart snapshot the draft was priced from;
    /// if the cart has moved on since, the whole operation fails with
    /// `Conflict` and the cart is left untouched. `Validation` when
    /// the draft has no items.
    fn create(&self, draft: OrderDraft, cart_version: i32) -> Result<OrderView, DomainError>;

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// All orders for the user, newest first.
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;

    /// Applies a status transition after checking it against the state
    /// machine. Illegal transitions are `Validation`, unknown orders
    /// `NotFound`.
    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError>;
}

/// Read-only access to the externally managed catalog.
pub trait CatalogRepository: Send + Sync + 'static {
    /// Active kitchens, best-rated first.
    fn list_kitchens(&self) -> Result<Vec<KitchenView>, DomainError>;

    fn find_kitchen(&self, id: Uuid) -> Result<Option<KitchenView>, DomainError>;

    /// Active plans, cheapest first.
    fn list_plans(&self) -> Result<Vec<PlanView>, DomainError>;

    fn plans_by_kitchen(&self, kitchen_id: Uuid) -> Result<Vec<PlanView>, DomainError>;
}
