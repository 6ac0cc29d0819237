use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "species")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Pet,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Pet => Entity::has_many(super::pet::Entity).into(),
        }
    }
}

impl Related<super::pet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::validation("species", "Species name cannot be empty."));
    }
    if name.len() > 255 {
        return Err(ModelError::validation("species", "Species name cannot exceed 255 characters."));
    }
    Ok(())
}

/// Insert a species. A name collision on the unique index maps to
/// `ModelError::Conflict` so callers can re-run the lookup.
pub async fn create(db: &DatabaseConnection, name: &str) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel { name: Set(name.to_string()), ..Default::default() };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ModelError::Conflict(format!("species '{}' already exists", name))
        }
        _ => ModelError::Db(e.to_string()),
    })
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::validate_name;

    #[test]
    fn rejects_blank_name() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        assert!(validate_name(&"a".repeat(256)).is_err());
        assert!(validate_name(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn accepts_regular_name() {
        assert!(validate_name("Dog").is_ok());
    }
}
