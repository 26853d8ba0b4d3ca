use std::sync::Arc;

use uuid::Uuid;

use crate::domain::cart::{CartView, LineItem};
use crate::domain::coupon;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

/// Use cases over the per-user cart. Validation lives here; the
/// repository only enforces storage-level invariants.
#[derive(Clone)]
pub struct CartService {
    repo: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repo: Arc<dyn CartRepository>) -> Self {
        Self { repo }
    }

    pub fn get_cart(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        self.repo.get_or_create(user_id)
    }

    pub fn add_item(
        &self,
        user_id: Uuid,
        line: LineItem,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        if line.quantity < 1 {
            return Err(DomainError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        if line.unit_price < bigdecimal::BigDecimal::from(0) {
            return Err(DomainError::Validation(
                "unit price must not be negative".to_string(),
            ));
        }
        self.repo.add_item(user_id, line, expected_version)
    }

    pub fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i32,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        self.repo
            .update_item_quantity(user_id, item_id, quantity, expected_version)
    }

    pub fn remove_item(&self, user_id: Uuid, item_id: &str) -> Result<CartView, DomainError> {
        self.repo.remove_item(user_id, item_id)
    }

    /// Resolves `code` against the static coupon table; unknown codes
    /// fail with `InvalidCoupon` and leave the cart untouched.
    pub fn apply_coupon(
        &self,
        user_id: Uuid,
        code: &str,
        expected_version: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let discount = coupon::resolve(code).ok_or(DomainError::InvalidCoupon)?;
        self.repo.set_coupon(user_id, code, discount, expected_version)
    }

    pub fn clear(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        self.repo.clear(user_id)
    }
}
