use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::cart::{CartView, LineItem};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "120.50"
    pub unit_price: String,
    pub image: Option<String>,
    /// Cart version the client last read; mismatch yields 409.
    pub version: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// New absolute quantity; zero or less removes the item.
    pub quantity: i32,
    pub version: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub coupon_code: String,
    pub version: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub item_id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub user_id: Uuid,
    pub items: Vec<CartItemResponse>,
    pub coupon_code: String,
    pub discount: String,
    pub version: i32,
    pub updated_at: String,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        CartResponse {
            user_id: cart.user_id,
            items: cart
                .items
                .into_iter()
                .map(|item| CartItemResponse {
                    item_id: item.item_id,
                    name: item.name,
                    unit_price: item.unit_price.to_string(),
                    quantity: item.quantity,
                    kitchen_id: item.kitchen_id,
                    kitchen_name: item.kitchen_name,
                    image: item.image,
                })
                .collect(),
            coupon_code: cart.coupon_code,
            discount: cart.discount.to_string(),
            version: cart.version,
            updated_at: cart.updated_at.to_rfc3339(),
        }
    }
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid unit_price '{raw}': {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
///
/// Returns the caller's cart, creating an empty one on first access.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Missing or invalid principal"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let cart = web::block(move || carts.get_cart(user.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart
///
/// Adds an item; a line with the same `(item_id, kitchen_id)` has its
/// quantity incremented instead of duplicating the entry.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 409, description = "Stale cart version"),
        (status = 422, description = "Invalid quantity or price"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let unit_price = parse_price(&body.unit_price)?;
    let line = LineItem {
        item_id: body.item_id,
        name: body.name,
        unit_price,
        quantity: body.quantity,
        kitchen_id: body.kitchen_id,
        kitchen_name: body.kitchen_name,
        image: body.image,
    };

    let carts = state.carts.clone();
    let cart = web::block(move || carts.add_item(user.0, line, body.version))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// PUT /cart/item/{item_id}
///
/// Sets the quantity of one cart line; zero or less removes it.
#[utoipa::path(
    put,
    path = "/cart/item/{item_id}",
    params(("item_id" = String, Path, description = "Catalog item id")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Cart or item not found"),
        (status = 409, description = "Stale cart version"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let body = body.into_inner();

    let carts = state.carts.clone();
    let cart =
        web::block(move || carts.update_item_quantity(user.0, &item_id, body.quantity, body.version))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /cart/item/{item_id}
///
/// Removes a line regardless of quantity. Removing an absent item is a
/// no-op, not an error.
#[utoipa::path(
    delete,
    path = "/cart/item/{item_id}",
    params(("item_id" = String, Path, description = "Catalog item id")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Cart not found"),
    ),
    tag = "cart"
)]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();

    let carts = state.carts.clone();
    let cart = web::block(move || carts.remove_item(user.0, &item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart/coupon
#[utoipa::path(
    post,
    path = "/cart/coupon",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Cart with the coupon applied", body = CartResponse),
        (status = 400, description = "Unknown coupon code"),
        (status = 404, description = "Cart not found"),
        (status = 409, description = "Stale cart version"),
    ),
    tag = "cart"
)]
pub async fn apply_coupon(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ApplyCouponRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let carts = state.carts.clone();
    let cart = web::block(move || carts.apply_coupon(user.0, &body.coupon_code, body.version))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 200, description = "The emptied cart", body = CartResponse),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let cart = web::block(move || carts.clear(user.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}
