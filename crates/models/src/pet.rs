use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Closed gender domain; wire form is SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetGender {
    #[sea_orm(string_value = "MALE")]
    Male,
    #[sea_orm(string_value = "FEMALE")]
    Female,
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
}

impl Default for PetGender {
    fn default() -> Self {
        Self::Unknown
    }
}

impl PetGender {
    /// Case-insensitive member lookup; `None` for values outside the domain.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Closed status domain; wire form is SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "SOLD")]
    Sold,
    #[sea_orm(string_value = "UNDER_TREATMENT")]
    UnderTreatment,
}

impl Default for PetStatus {
    fn default() -> Self {
        Self::Sold
    }
}

impl PetStatus {
    /// Case-insensitive member lookup; `None` for values outside the domain.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Some(Self::Available),
            "SOLD" => Some(Self::Sold),
            "UNDER_TREATMENT" => Some(Self::UnderTreatment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Sold => "SOLD",
            Self::UnderTreatment => "UNDER_TREATMENT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub species_id: i64,
    pub age: i32,
    pub breed: String,
    pub gender: PetGender,
    pub status: PetStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Species,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Species => Entity::belongs_to(super::species::Entity)
                .from(Column::SpeciesId)
                .to(super::species::Column::Id)
                .into(),
        }
    }
}

impl Related<super::species::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Species.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn is_letters_and_whitespace(s: &str) -> bool {
    s.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::validation("name", "Name cannot be empty."));
    }
    if name.chars().count() < 2 {
        return Err(ModelError::validation("name", "Pet name must be at least 2 characters long."));
    }
    if name.chars().count() > 255 {
        return Err(ModelError::validation("name", "Pet name cannot exceed 255 characters."));
    }
    if !is_letters_and_whitespace(name) {
        return Err(ModelError::validation("name", "Pet name can only contain letters and spaces."));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), ModelError> {
    if age <= 0 {
        return Err(ModelError::validation("age", "Age must be a positive number."));
    }
    if age > 30 {
        return Err(ModelError::validation("age", "Maximum pet age is 30 years."));
    }
    Ok(())
}

pub fn validate_breed(breed: &str) -> Result<(), ModelError> {
    if breed.trim().is_empty() {
        return Err(ModelError::validation("breed", "Breed cannot be empty."));
    }
    if breed.chars().count() < 2 {
        return Err(ModelError::validation("breed", "Breed must be at least 2 characters long."));
    }
    if breed.chars().count() > 255 {
        return Err(ModelError::validation("breed", "Breed cannot exceed 255 characters."));
    }
    if !is_letters_and_whitespace(breed) {
        return Err(ModelError::validation("breed", "Breed can only contain letters and spaces."));
    }
    Ok(())
}

/// Insert a pet. The species reference must already be resolved; a foreign-key
/// violation maps to a validation error on `species`.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    species_id: i64,
    age: i32,
    breed: &str,
    gender: PetGender,
    status: PetStatus,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_age(age)?;
    validate_breed(breed)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.to_string()),
        species_id: Set(species_id),
        age: Set(age),
        breed: Set(breed.to_string()),
        gender: Set(gender),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ModelError::validation("species", "Species reference does not exist.")
        }
        _ => ModelError::Db(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parse_is_case_insensitive() {
        assert_eq!(PetGender::parse("male"), Some(PetGender::Male));
        assert_eq!(PetGender::parse("Female"), Some(PetGender::Female));
        assert_eq!(PetGender::parse("UNKNOWN"), Some(PetGender::Unknown));
        assert_eq!(PetGender::parse("robot"), None);
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(PetStatus::parse("available"), Some(PetStatus::Available));
        assert_eq!(PetStatus::parse("under_treatment"), Some(PetStatus::UnderTreatment));
        assert_eq!(PetStatus::parse("INVALID"), None);
    }

    #[test]
    fn enum_wire_form_is_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&PetStatus::UnderTreatment).unwrap(), "\"UNDER_TREATMENT\"");
        assert_eq!(serde_json::to_string(&PetGender::Male).unwrap(), "\"MALE\"");
        let parsed: PetStatus = serde_json::from_str("\"SOLD\"").unwrap();
        assert_eq!(parsed, PetStatus::Sold);
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("Buddy").is_ok());
        assert!(validate_name("Mr Whiskers").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("B").is_err());
        assert!(validate_name("R2D2").is_err());
        assert!(validate_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn age_rules() {
        assert!(validate_age(1).is_ok());
        assert!(validate_age(30).is_ok());
        assert!(validate_age(0).is_err());
        assert!(validate_age(-3).is_err());
        assert!(validate_age(31).is_err());
    }

    #[test]
    fn breed_rules() {
        assert!(validate_breed("Golden Retriever").is_ok());
        assert!(validate_breed("").is_err());
        assert!(validate_breed("X").is_err());
        assert!(validate_breed("Type 9").is_err());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = validate_age(0).unwrap_err();
        match err {
            crate::errors::ModelError::Validation { field, .. } => assert_eq!(field, "age"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
