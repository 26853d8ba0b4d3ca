use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{KitchenView, PlanView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{kitchens, plans};

use super::models::{KitchenRow, PlanRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn kitchen_view(row: KitchenRow) -> KitchenView {
    KitchenView {
        id: row.id,
        name: row.name,
        description: row.description,
        image: row.image,
        rating: row.rating,
        total_ratings: row.total_ratings,
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

fn plan_view(row: PlanRow) -> PlanView {
    PlanView {
        id: row.id,
        kitchen_id: row.kitchen_id,
        name: row.name,
        description: row.description,
        price: row.price,
        duration_days: row.duration_days,
        meals_per_day: row.meals_per_day,
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_kitchens(&self) -> Result<Vec<KitchenView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = kitchens::table
            .filter(kitchens::is_active.eq(true))
            .select(KitchenRow::as_select())
            .order(kitchens::rating.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(kitchen_view).collect())
    }

    fn find_kitchen(&self, id: Uuid) -> Result<Option<KitchenView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = kitchens::table
            .find(id)
            .select(KitchenRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(kitchen_view))
    }

    fn list_plans(&self) -> Result<Vec<PlanView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = plans::table
            .filter(plans::is_active.eq(true))
            .select(PlanRow::as_select())
            .order(plans::price.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(plan_view).collect())
    }

    fn plans_by_kitchen(&self, kitchen_id: Uuid) -> Result<Vec<PlanView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = plans::table
            .filter(plans::kitchen_id.eq(kitchen_id))
            .filter(plans::is_active.eq(true))
            .select(PlanRow::as_select())
            .order(plans::price.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(plan_view).collect())
    }
}
