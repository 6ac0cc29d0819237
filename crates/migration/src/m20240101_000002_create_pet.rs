//! Create `pet` table.
//! Scalar fields plus a required species reference; removing a species
//! removes its pets.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pet::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Pet::Name, 255).not_null())
                    .col(big_integer(Pet::SpeciesId).not_null())
                    .col(integer(Pet::Age).not_null())
                    .col(string_len(Pet::Breed, 255).not_null())
                    .col(string_len(Pet::Gender, 10).not_null())
                    .col(string_len(Pet::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Pet::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Pet::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pet_species")
                            .from(Pet::Table, Pet::SpeciesId)
                            .to(Species::Table, Species::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Pet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Pet {
    Table,
    Id,
    Name,
    SpeciesId,
    Age,
    Breed,
    Gender,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Species { Table, Id }
