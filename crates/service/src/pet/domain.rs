use models::pet::{self, PetGender, PetStatus};
use models::species;

/// A pet joined with the species row it references.
pub type PetWithSpecies = (pet::Model, species::Model);

/// Service-level create input; the species is still a name at this point.
#[derive(Debug, Clone)]
pub struct PetInput {
    pub name: String,
    pub species: String,
    pub age: i32,
    pub breed: String,
    pub gender: PetGender,
    pub status: PetStatus,
}

/// Service-level partial update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UpdatePet {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: Option<i32>,
    pub breed: Option<String>,
    pub gender: Option<PetGender>,
    pub status: Option<PetStatus>,
}

/// Repository-level create input; the species reference is resolved.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species_id: i64,
    pub age: i32,
    pub breed: String,
    pub gender: PetGender,
    pub status: PetStatus,
}

/// Repository-level partial update with a resolved species reference.
#[derive(Debug, Clone, Default)]
pub struct PetChanges {
    pub name: Option<String>,
    pub species_id: Option<i64>,
    pub age: Option<i32>,
    pub breed: Option<String>,
    pub gender: Option<PetGender>,
    pub status: Option<PetStatus>,
}

/// List filters; string matches are case-insensitive exact.
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub species: Option<String>,
    pub species_id: Option<i64>,
    pub breed: Option<String>,
    pub gender: Option<PetGender>,
    pub status: Option<PetStatus>,
}

/// One page of list results plus the filtered total.
#[derive(Debug, Clone)]
pub struct PetPage {
    pub items: Vec<PetWithSpecies>,
    pub total: u64,
}
