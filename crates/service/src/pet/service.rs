use std::sync::Arc;

use tracing::{info, instrument};

use models::pet::{self, PetStatus};
use models::species;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

use super::domain::{NewPet, PetChanges, PetFilter, PetInput, PetPage, PetWithSpecies, UpdatePet};
use super::repository::PetRepository;

/// Application service encapsulating pet business rules.
/// Field validation and species resolution happen here; storage access is
/// delegated to the injected repository.
pub struct PetService<R: PetRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: PetRepository + ?Sized> PetService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Filtered, optionally paginated listing.
    pub async fn list(&self, filter: &PetFilter, page: Option<Pagination>) -> Result<PetPage, ServiceError> {
        self.repo.list(filter, page).await
    }

    /// Lookup by id; absence is `None`, not an error.
    pub async fn get(&self, id: i64) -> Result<Option<PetWithSpecies>, ServiceError> {
        self.repo.get(id).await
    }

    /// Create a pet, resolving (or creating) the species by name first.
    #[instrument(skip(self, input), fields(name = %input.name, species = %input.species))]
    pub async fn create(&self, input: PetInput) -> Result<PetWithSpecies, ServiceError> {
        pet::validate_name(&input.name)?;
        pet::validate_age(input.age)?;
        pet::validate_breed(&input.breed)?;
        species::validate_name(&input.species)?;

        let sp = self.repo.resolve_species(input.species.trim()).await?;
        let created = self
            .repo
            .create(NewPet {
                name: input.name,
                species_id: sp.id,
                age: input.age,
                breed: input.breed,
                gender: input.gender,
                status: input.status,
            })
            .await?;
        info!(id = created.0.id, species_id = sp.id, "pet_created");
        Ok(created)
    }

    /// Partial update: only provided fields change, each re-validated; a
    /// species name is re-resolved the same way create resolves it.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: UpdatePet) -> Result<PetWithSpecies, ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("pet"));
        }

        if let Some(name) = update.name.as_deref() {
            pet::validate_name(name)?;
        }
        if let Some(age) = update.age {
            pet::validate_age(age)?;
        }
        if let Some(breed) = update.breed.as_deref() {
            pet::validate_breed(breed)?;
        }
        let species_id = match update.species.as_deref() {
            Some(raw) => {
                species::validate_name(raw)?;
                Some(self.repo.resolve_species(raw.trim()).await?.id)
            }
            None => None,
        };

        let updated = self
            .repo
            .update(
                id,
                PetChanges {
                    name: update.name,
                    species_id,
                    age: update.age,
                    breed: update.breed,
                    gender: update.gender,
                    status: update.status,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("pet"))?;
        info!(id, "pet_updated");
        Ok(updated)
    }

    /// Delete by id; a missing id is a not-found error.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete(id).await? {
            info!(id, "pet_deleted");
            Ok(())
        } else {
            Err(ServiceError::not_found("pet"))
        }
    }

    /// All pets of the named species; an unknown name yields an empty list.
    pub async fn get_pets_by_species(&self, name: &str) -> Result<Vec<PetWithSpecies>, ServiceError> {
        let Some(sp) = self.repo.find_species(name).await? else {
            return Ok(Vec::new());
        };
        let page = self
            .repo
            .list(&PetFilter { species_id: Some(sp.id), ..Default::default() }, None)
            .await?;
        Ok(page.items)
    }

    /// All pets with the given status; a value outside the enumerated domain
    /// is a validation error, never a partial result.
    pub async fn get_pets_by_status(&self, raw: &str) -> Result<Vec<PetWithSpecies>, ServiceError> {
        let status = PetStatus::parse(raw)
            .ok_or_else(|| ServiceError::validation("status", format!("Invalid status: {raw}")))?;
        let page = self
            .repo
            .list(&PetFilter { status: Some(status), ..Default::default() }, None)
            .await?;
        Ok(page.items)
    }
}
