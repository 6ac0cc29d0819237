//! Secondary indexes for the common list filters.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_pet_species_id")
                    .table(Pet::Table)
                    .col(Pet::SpeciesId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pet_status")
                    .table(Pet::Table)
                    .col(Pet::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_pet_status").table(Pet::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_pet_species_id").table(Pet::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Pet { Table, SpeciesId, Status }
