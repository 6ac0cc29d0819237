use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use models::pet::{PetGender, PetStatus};
use service::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use service::pet::domain::{PetFilter, PetInput, PetWithSpecies, UpdatePet};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePetInput {
    pub name: String,
    pub species: String,
    pub age: i32,
    pub breed: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct UpdatePetInput {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: Option<i32>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

/// Wire representation of a pet; the species is exposed by name.
#[derive(Debug, Serialize)]
pub struct PetDto {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: i32,
    pub breed: String,
    pub gender: PetGender,
    pub status: PetStatus,
}

impl From<PetWithSpecies> for PetDto {
    fn from((p, s): PetWithSpecies) -> Self {
        Self {
            id: p.id,
            name: p.name,
            species: s.name,
            age: p.age,
            breed: p.breed,
            gender: p.gender,
            status: p.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PetListResponse {
    pub pets: Vec<PetDto>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

fn parse_gender(raw: &str) -> Result<PetGender, JsonApiError> {
    PetGender::parse(raw)
        .ok_or_else(|| JsonApiError::validation("gender", format!("Invalid gender: {raw}")))
}

fn parse_status(raw: &str) -> Result<PetStatus, JsonApiError> {
    PetStatus::parse(raw)
        .ok_or_else(|| JsonApiError::validation("status", format!("Invalid status: {raw}")))
}

#[utoipa::path(
    get, path = "/pets", tag = "pets",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated pet list"),
        (status = 400, description = "Invalid filter value"),
        (status = 500, description = "List failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<PetListResponse>, JsonApiError> {
    let gender = q.gender.as_deref().map(parse_gender).transpose()?;
    let status = q.status.as_deref().map(parse_status).transpose()?;
    let filter = PetFilter {
        species: q.species,
        breed: q.breed,
        gender,
        status,
        ..Default::default()
    };
    let page_no = q.page.unwrap_or(1);
    let result = state
        .pets
        .list(&filter, Some(Pagination { page: page_no, per_page: DEFAULT_PAGE_SIZE }))
        .await?;
    info!(count = result.items.len(), total = result.total, "list pets");
    Ok(Json(PetListResponse {
        pets: result.items.into_iter().map(PetDto::from).collect(),
        page: page_no,
        per_page: DEFAULT_PAGE_SIZE,
        total: result.total,
    }))
}

#[utoipa::path(
    post, path = "/pets", tag = "pets",
    request_body = crate::openapi::CreatePetInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Species creation conflict"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreatePetInput>,
) -> Result<(StatusCode, Json<PetDto>), JsonApiError> {
    let gender = match input.gender.as_deref() {
        Some(raw) => parse_gender(raw)?,
        None => PetGender::default(),
    };
    let status = match input.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => PetStatus::default(),
    };
    let created = state
        .pets
        .create(PetInput {
            name: input.name,
            species: input.species,
            age: input.age,
            breed: input.breed,
            gender,
            status,
        })
        .await?;
    info!(id = created.0.id, species = %created.1.name, "created pet");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get, path = "/pets/{id}", tag = "pets",
    params(("id" = i64, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<PetDto>, JsonApiError> {
    match state.pets.get(id).await? {
        Some(found) => Ok(Json(found.into())),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Pet not found.")),
    }
}

#[utoipa::path(
    put, path = "/pets/{id}", tag = "pets",
    params(("id" = i64, Path, description = "Pet ID")),
    request_body = crate::openapi::UpdatePetInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePetInput>,
) -> Result<Json<PetDto>, JsonApiError> {
    let gender = input.gender.as_deref().map(parse_gender).transpose()?;
    let status = input.status.as_deref().map(parse_status).transpose()?;
    let updated = state
        .pets
        .update(
            id,
            UpdatePet {
                name: input.name,
                species: input.species,
                age: input.age,
                breed: input.breed,
                gender,
                status,
            },
        )
        .await?;
    info!(id, "updated pet");
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete, path = "/pets/{id}", tag = "pets",
    params(("id" = i64, Path, description = "Pet ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, JsonApiError> {
    state.pets.delete(id).await?;
    info!(id, "deleted pet");
    Ok(StatusCode::NO_CONTENT)
}
