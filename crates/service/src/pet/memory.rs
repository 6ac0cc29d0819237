//! In-memory repository backend for tests and development.
//!
//! Mirrors the observable semantics of the SeaORM implementation: absence is
//! `None`, species names are unique, list filters are case-insensitive exact.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use models::pet;
use models::species;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

use super::domain::{NewPet, PetChanges, PetFilter, PetPage, PetWithSpecies};
use super::repository::PetRepository;

#[derive(Default)]
pub struct InMemoryPetRepository {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    pets: BTreeMap<i64, pet::Model>,
    species: BTreeMap<i64, species::Model>,
    next_pet_id: i64,
    next_species_id: i64,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(p: &pet::Model, sp: &species::Model, f: &PetFilter) -> bool {
    if let Some(name) = &f.species {
        if !sp.name.eq_ignore_ascii_case(name) {
            return false;
        }
    }
    if let Some(id) = f.species_id {
        if p.species_id != id {
            return false;
        }
    }
    if let Some(breed) = &f.breed {
        if !p.breed.eq_ignore_ascii_case(breed) {
            return false;
        }
    }
    if let Some(g) = f.gender {
        if p.gender != g {
            return false;
        }
    }
    if let Some(s) = f.status {
        if p.status != s {
            return false;
        }
    }
    true
}

impl Store {
    fn species_of(&self, p: &pet::Model) -> Result<species::Model, ServiceError> {
        self.species
            .get(&p.species_id)
            .cloned()
            .ok_or_else(|| ServiceError::Db(format!("pet {} has no species row", p.id)))
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn list(&self, filter: &PetFilter, page: Option<Pagination>) -> Result<PetPage, ServiceError> {
        let store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = Vec::new();
        for p in store.pets.values() {
            let sp = store.species_of(p)?;
            if matches(p, &sp, filter) {
                all.push((p.clone(), sp));
            }
        }
        let total = all.len() as u64;
        let items = match page {
            Some(p) => {
                let (page_idx, per_page) = p.normalize();
                all.into_iter()
                    .skip((page_idx * per_page) as usize)
                    .take(per_page as usize)
                    .collect()
            }
            None => all,
        };
        Ok(PetPage { items, total })
    }

    async fn get(&self, id: i64) -> Result<Option<PetWithSpecies>, ServiceError> {
        let store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match store.pets.get(&id) {
            Some(p) => Ok(Some((p.clone(), store.species_of(p)?))),
            None => Ok(None),
        }
    }

    async fn create(&self, new: NewPet) -> Result<PetWithSpecies, ServiceError> {
        pet::validate_name(&new.name)?;
        pet::validate_age(new.age)?;
        pet::validate_breed(&new.breed)?;

        let mut store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let sp = store
            .species
            .get(&new.species_id)
            .cloned()
            .ok_or_else(|| ServiceError::validation("species", "Species reference does not exist."))?;

        store.next_pet_id += 1;
        let now = Utc::now().into();
        let model = pet::Model {
            id: store.next_pet_id,
            name: new.name,
            species_id: new.species_id,
            age: new.age,
            breed: new.breed,
            gender: new.gender,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        store.pets.insert(model.id, model.clone());
        Ok((model, sp))
    }

    async fn update(&self, id: i64, changes: PetChanges) -> Result<Option<PetWithSpecies>, ServiceError> {
        let mut store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(mut model) = store.pets.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            model.name = name;
        }
        if let Some(species_id) = changes.species_id {
            if !store.species.contains_key(&species_id) {
                return Err(ServiceError::validation("species", "Species reference does not exist."));
            }
            model.species_id = species_id;
        }
        if let Some(age) = changes.age {
            model.age = age;
        }
        if let Some(breed) = changes.breed {
            model.breed = breed;
        }
        if let Some(g) = changes.gender {
            model.gender = g;
        }
        if let Some(s) = changes.status {
            model.status = s;
        }
        model.updated_at = Utc::now().into();
        let sp = store.species_of(&model)?;
        store.pets.insert(id, model.clone());
        Ok(Some((model, sp)))
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(store.pets.remove(&id).is_some())
    }

    async fn find_species(&self, name: &str) -> Result<Option<species::Model>, ServiceError> {
        let store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(store.species.values().find(|s| s.name == name).cloned())
    }

    async fn resolve_species(&self, name: &str) -> Result<species::Model, ServiceError> {
        species::validate_name(name)?;
        let mut store = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = store.species.values().find(|s| s.name == name).cloned() {
            return Ok(existing);
        }
        store.next_species_id += 1;
        let model = species::Model { id: store.next_species_id, name: name.to_string() };
        store.species.insert(model.id, model.clone());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::pet::{PetGender, PetStatus};

    async fn seed(repo: &InMemoryPetRepository) -> PetWithSpecies {
        let sp = repo.resolve_species("Dog").await.unwrap();
        repo.create(NewPet {
            name: "Buddy".into(),
            species_id: sp.id,
            age: 3,
            breed: "Golden Retriever".into(),
            gender: PetGender::Male,
            status: PetStatus::Available,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let repo = InMemoryPetRepository::new();
        let (first, _) = seed(&repo).await;
        let (second, _) = seed(&repo).await;
        assert_eq!(first.id + 1, second.id);
    }

    #[tokio::test]
    async fn filters_are_case_insensitive() {
        let repo = InMemoryPetRepository::new();
        seed(&repo).await;

        let by_species = repo
            .list(&PetFilter { species: Some("dog".into()), ..Default::default() }, None)
            .await
            .unwrap();
        assert_eq!(by_species.total, 1);

        let by_breed = repo
            .list(&PetFilter { breed: Some("GOLDEN RETRIEVER".into()), ..Default::default() }, None)
            .await
            .unwrap();
        assert_eq!(by_breed.total, 1);

        let miss = repo
            .list(&PetFilter { breed: Some("Poodle".into()), ..Default::default() }, None)
            .await
            .unwrap();
        assert_eq!(miss.total, 0);
    }

    #[tokio::test]
    async fn pagination_slices_and_reports_total() {
        let repo = InMemoryPetRepository::new();
        for _ in 0..5 {
            seed(&repo).await;
        }
        let page = repo
            .list(
                &PetFilter::default(),
                Some(Pagination { page: 2, per_page: 2 }),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].0.id, 3);
    }

    #[tokio::test]
    async fn create_requires_existing_species() {
        let repo = InMemoryPetRepository::new();
        let res = repo
            .create(NewPet {
                name: "Ghost".into(),
                species_id: 42,
                age: 1,
                breed: "Siamese".into(),
                gender: PetGender::Unknown,
                status: PetStatus::Sold,
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Validation { .. })));
    }
}
