use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::db::connect;
use crate::errors::ModelError;
use crate::pet::{PetGender, PetStatus};
use crate::{pet, species};

/// Connect and migrate, or `None` when no database is available.
async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

#[tokio::test]
async fn test_species_crud_and_unique_name() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("Species {}", Uuid::new_v4().simple());
    let created = species::create(&db, &name).await?;
    assert!(created.id > 0);
    assert_eq!(created.name, name);

    let found = species::find_by_name(&db, &name).await?;
    assert_eq!(found.as_ref().map(|s| s.id), Some(created.id));

    // Second insert under the same name must surface as a conflict
    let dup = species::create(&db, &name).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    species::Entity::delete_by_id(created.id).exec(&db).await?;
    let gone = species::find_by_name(&db, &name).await?;
    assert!(gone.is_none());
    Ok(())
}

#[tokio::test]
async fn test_pet_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let species_name = format!("Dogs {}", Uuid::new_v4().simple());
    let sp = species::create(&db, &species_name).await?;

    let created = pet::create(&db, "Buddy", sp.id, 3, "Golden Retriever", PetGender::Male, PetStatus::Available).await?;
    assert!(created.id > 0);
    assert_eq!(created.name, "Buddy");
    assert_eq!(created.species_id, sp.id);
    assert_eq!(created.age, 3);
    assert_eq!(created.gender, PetGender::Male);
    assert_eq!(created.status, PetStatus::Available);

    let found = pet::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|p| p.breed.as_str()), Some("Golden Retriever"));

    let by_species = pet::Entity::find()
        .filter(pet::Column::SpeciesId.eq(sp.id))
        .all(&db)
        .await?;
    assert_eq!(by_species.len(), 1);

    pet::Entity::delete_by_id(created.id).exec(&db).await?;
    species::Entity::delete_by_id(sp.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_pet_rejects_unresolved_species() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let res = pet::create(&db, "Ghost", i64::MAX - 7, 2, "Siamese", PetGender::Female, PetStatus::Sold).await;
    match res {
        Err(ModelError::Validation { field, .. }) => assert_eq!(field, "species"),
        other => panic!("expected species validation error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_species_delete_cascades_pets() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let species_name = format!("Cats {}", Uuid::new_v4().simple());
    let sp = species::create(&db, &species_name).await?;
    let p = pet::create(&db, "Misty", sp.id, 4, "Persian", PetGender::Female, PetStatus::Available).await?;

    species::Entity::delete_by_id(sp.id).exec(&db).await?;

    let orphan = pet::Entity::find_by_id(p.id).one(&db).await?;
    assert!(orphan.is_none());
    Ok(())
}
