use std::sync::Arc;

use uuid::Uuid;

use crate::domain::catalog::{KitchenView, PlanView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

/// Read-only catalog lookups. The catalog is seeded by an external
/// administrative process; nothing here writes.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub fn list_kitchens(&self) -> Result<Vec<KitchenView>, DomainError> {
        self.repo.list_kitchens()
    }

    pub fn get_kitchen(&self, id: Uuid) -> Result<KitchenView, DomainError> {
        self.repo
            .find_kitchen(id)?
            .ok_or(DomainError::NotFound("Kitchen"))
    }

    pub fn list_plans(&self) -> Result<Vec<PlanView>, DomainError> {
        self.repo.list_plans()
    }

    pub fn plans_by_kitchen(&self, kitchen_id: Uuid) -> Result<Vec<PlanView>, DomainError> {
        self.repo.plans_by_kitchen(kitchen_id)
    }
}
