use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{KitchenView, PlanView};
use crate::errors::AppError;
use crate::AppState;

// Catalog routes are public: browsing kitchens and plans needs no
// principal.

#[derive(Debug, Serialize, ToSchema)]
pub struct KitchenResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub rating: String,
    pub total_ratings: i32,
}

impl From<KitchenView> for KitchenResponse {
    fn from(kitchen: KitchenView) -> Self {
        KitchenResponse {
            id: kitchen.id,
            name: kitchen.name,
            description: kitchen.description,
            image: kitchen.image,
            rating: kitchen.rating.to_string(),
            total_ratings: kitchen.total_ratings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub kitchen_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub duration_days: i32,
    pub meals_per_day: i32,
}

impl From<PlanView> for PlanResponse {
    fn from(plan: PlanView) -> Self {
        PlanResponse {
            id: plan.id,
            kitchen_id: plan.kitchen_id,
            name: plan.name,
            description: plan.description,
            price: plan.price.to_string(),
            duration_days: plan.duration_days,
            meals_per_day: plan.meals_per_day,
        }
    }
}

/// GET /kitchens
#[utoipa::path(
    get,
    path = "/kitchens",
    responses(
        (status = 200, description = "Active kitchens, best-rated first", body = [KitchenResponse]),
    ),
    tag = "catalog"
)]
pub async fn list_kitchens(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let kitchens = web::block(move || catalog.list_kitchens())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let kitchens: Vec<KitchenResponse> = kitchens.into_iter().map(KitchenResponse::from).collect();
    Ok(HttpResponse::Ok().json(kitchens))
}

/// GET /kitchens/{id}
#[utoipa::path(
    get,
    path = "/kitchens/{id}",
    params(("id" = Uuid, Path, description = "Kitchen id")),
    responses(
        (status = 200, description = "Kitchen found", body = KitchenResponse),
        (status = 404, description = "Kitchen not found"),
    ),
    tag = "catalog"
)]
pub async fn get_kitchen(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let kitchen = web::block(move || catalog.get_kitchen(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(KitchenResponse::from(kitchen)))
}

/// GET /plans
#[utoipa::path(
    get,
    path = "/plans",
    responses(
        (status = 200, description = "Active plans, cheapest first", body = [PlanResponse]),
    ),
    tag = "catalog"
)]
pub async fn list_plans(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let plans = web::block(move || catalog.list_plans())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let plans: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();
    Ok(HttpResponse::Ok().json(plans))
}

/// GET /plans/kitchen/{kitchen_id}
#[utoipa::path(
    get,
    path = "/plans/kitchen/{kitchen_id}",
    params(("kitchen_id" = Uuid, Path, description = "Kitchen id")),
    responses(
        (status = 200, description = "Active plans for the kitchen", body = [PlanResponse]),
    ),
    tag = "catalog"
)]
pub async fn plans_by_kitchen(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let kitchen_id = path.into_inner();
    let catalog = state.catalog.clone();
    let plans = web::block(move || catalog.plans_by_kitchen(kitchen_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let plans: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();
    Ok(HttpResponse::Ok().json(plans))
}
