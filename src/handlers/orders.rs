use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::order::{DeliveryAddress, GeoPoint, OrderStatus, OrderView, PaymentMethod};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeoPointDto {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliveryAddressDto {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub coordinates: Option<GeoPointDto>,
}

impl From<DeliveryAddressDto> for DeliveryAddress {
    fn from(dto: DeliveryAddressDto) -> Self {
        DeliveryAddress {
            street: dto.street,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            coordinates: dto.coordinates.map(|c| GeoPoint {
                latitude: c.latitude,
                longitude: c.longitude,
            }),
        }
    }
}

/// Checkout carries no items or prices: the stored cart is the
/// authoritative input for both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub delivery_address: DeliveryAddressDto,
    /// One of "razorpay", "stripe", "cash". Defaults to "razorpay".
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryAddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPointResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GeoPointResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<DeliveryAddress> for DeliveryAddressResponse {
    fn from(address: DeliveryAddress) -> Self {
        DeliveryAddressResponse {
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            coordinates: address.coordinates.map(|c| GeoPointResponse {
                latitude: c.latitude,
                longitude: c.longitude,
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub item_id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub kitchen_id: Uuid,
    pub kitchen_name: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: String,
    pub tax: String,
    pub delivery_fee: String,
    pub discount: String,
    pub final_amount: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub delivery_address: DeliveryAddressResponse,
    pub estimated_delivery_time: String,
    pub created_at: String,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            kitchen_id: order.kitchen_id,
            kitchen_name: order.kitchen_name,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    item_id: item.item_id,
                    name: item.name,
                    unit_price: item.unit_price.to_string(),
                    quantity: item.quantity,
                    image: item.image,
                })
                .collect(),
            total_amount: order.total_amount.to_string(),
            tax: order.tax.to_string(),
            delivery_fee: order.delivery_fee.to_string(),
            discount: order.discount.to_string(),
            final_amount: order.final_amount.to_string(),
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            delivery_address: DeliveryAddressResponse::from(order.delivery_address),
            estimated_delivery_time: order.estimated_delivery_time.to_rfc3339(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// All of the caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid principal"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let orders = state.orders.clone();
    let list = web::block(move || orders.list_orders(user.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let list: Vec<OrderResponse> = list.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(list))
}

/// GET /orders/{id}
///
/// Ownership is enforced: someone else's order is a 403, never a 404,
/// so "not yours" stays distinguishable from "doesn't exist".
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let orders = state.orders.clone();
    let order = web::block(move || orders.get_order(user.0, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders
///
/// Checkout: prices the stored cart, creates the order and empties the
/// cart in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 409, description = "Cart changed while checking out"),
        (status = 422, description = "Empty cart or invalid payment method"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let payment_method = match body.payment_method.as_deref() {
        None => PaymentMethod::default(),
        Some(raw) => PaymentMethod::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("unknown payment method '{raw}'")))?,
    };
    let address = DeliveryAddress::from(body.delivery_address);

    let orders = state.orders.clone();
    let order = web::block(move || orders.checkout(user.0, address, payment_method))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}/status
///
/// Applies one step of the delivery state machine; anything outside
/// the transition table is rejected.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Order with the new status", body = OrderResponse),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Unknown status or illegal transition"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = OrderStatus::parse(&body.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status '{}'", body.status)))?;

    let orders = state.orders.clone();
    let order = web::block(move || orders.update_status(user.0, order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
