use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use models::errors::ModelError;
use models::{pet, species};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

use super::domain::{NewPet, PetChanges, PetFilter, PetPage, PetWithSpecies};

/// Persistence abstraction for pets and their species references.
///
/// Read paths signal absence with `None`; only the service layer turns that
/// into a not-found error.
#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn list(&self, filter: &PetFilter, page: Option<Pagination>) -> Result<PetPage, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<PetWithSpecies>, ServiceError>;
    async fn create(&self, new: NewPet) -> Result<PetWithSpecies, ServiceError>;
    async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<PetWithSpecies>, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;

    /// Exact-name species lookup.
    async fn find_species(&self, name: &str) -> Result<Option<species::Model>, ServiceError>;
    /// Resolve a species by name, creating it when absent. Losing the insert
    /// race against a concurrent creator is answered by one lookup retry.
    async fn resolve_species(&self, name: &str) -> Result<species::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPetRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

fn with_species(row: (pet::Model, Option<species::Model>)) -> Result<PetWithSpecies, ServiceError> {
    let (p, s) = row;
    let s = s.ok_or_else(|| ServiceError::Db(format!("pet {} has no species row", p.id)))?;
    Ok((p, s))
}

fn apply_filter<Q: QueryFilter>(mut q: Q, f: &PetFilter) -> Q {
    if let Some(name) = &f.species {
        q = q.filter(
            Expr::expr(Func::lower(Expr::col((species::Entity, species::Column::Name))))
                .eq(name.to_lowercase()),
        );
    }
    if let Some(id) = f.species_id {
        q = q.filter(pet::Column::SpeciesId.eq(id));
    }
    if let Some(breed) = &f.breed {
        q = q.filter(
            Expr::expr(Func::lower(Expr::col((pet::Entity, pet::Column::Breed))))
                .eq(breed.to_lowercase()),
        );
    }
    if let Some(g) = f.gender {
        q = q.filter(pet::Column::Gender.eq(g));
    }
    if let Some(s) = f.status {
        q = q.filter(pet::Column::Status.eq(s));
    }
    q
}

#[async_trait]
impl PetRepository for SeaOrmPetRepository {
    async fn list(&self, filter: &PetFilter, page: Option<Pagination>) -> Result<PetPage, ServiceError> {
        let query = apply_filter(
            pet::Entity::find()
                .find_also_related(species::Entity)
                .order_by_asc(pet::Column::Id),
            filter,
        );
        let (rows, total) = match page {
            Some(p) => {
                let (page_idx, per_page) = p.normalize();
                let paginator = query.paginate(&self.db, per_page);
                let total = paginator.num_items().await.map_err(db_err)?;
                let rows = paginator.fetch_page(page_idx).await.map_err(db_err)?;
                (rows, total)
            }
            None => {
                let rows = query.all(&self.db).await.map_err(db_err)?;
                let total = rows.len() as u64;
                (rows, total)
            }
        };
        let items = rows.into_iter().map(with_species).collect::<Result<Vec<_>, _>>()?;
        Ok(PetPage { items, total })
    }

    async fn get(&self, id: i64) -> Result<Option<PetWithSpecies>, ServiceError> {
        let row = pet::Entity::find_by_id(id)
            .find_also_related(species::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        row.map(with_species).transpose()
    }

    async fn create(&self, new: NewPet) -> Result<PetWithSpecies, ServiceError> {
        let created = pet::create(
            &self.db,
            &new.name,
            new.species_id,
            new.age,
            &new.breed,
            new.gender,
            new.status,
        )
        .await?;
        let sp = species::Entity::find_by_id(new.species_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ServiceError::Db(format!("species {} missing after pet insert", new.species_id)))?;
        Ok((created, sp))
    }

    async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<PetWithSpecies>, ServiceError> {
        let Some(found) = pet::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let mut am: pet::ActiveModel = found.into();
        if let Some(name) = changes.name {
            am.name = Set(name);
        }
        if let Some(species_id) = changes.species_id {
            am.species_id = Set(species_id);
        }
        if let Some(age) = changes.age {
            am.age = Set(age);
        }
        if let Some(breed) = changes.breed {
            am.breed = Set(breed);
        }
        if let Some(g) = changes.gender {
            am.gender = Set(g);
        }
        if let Some(s) = changes.status {
            am.status = Set(s);
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        let sp = updated
            .find_related(species::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ServiceError::Db(format!("pet {} has no species row", updated.id)))?;
        Ok(Some((updated, sp)))
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = pet::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_species(&self, name: &str) -> Result<Option<species::Model>, ServiceError> {
        Ok(species::find_by_name(&self.db, name).await?)
    }

    async fn resolve_species(&self, name: &str) -> Result<species::Model, ServiceError> {
        if let Some(found) = species::find_by_name(&self.db, name).await? {
            return Ok(found);
        }
        match species::create(&self.db, name).await {
            Ok(created) => {
                info!(species = %created.name, id = created.id, "auto_created_species");
                Ok(created)
            }
            Err(ModelError::Conflict(_)) => {
                // Lost the insert race; the winner's row must be visible now
                species::find_by_name(&self.db, name).await?.ok_or_else(|| {
                    ServiceError::Conflict(format!("species '{}' is being created concurrently", name))
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
