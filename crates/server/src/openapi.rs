use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CreatePetInputDoc {
    pub name: String,
    pub species: String,
    pub age: i32,
    pub breed: String,
    pub gender: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdatePetInputDoc {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: Option<i32>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct PetDoc {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: i32,
    pub breed: String,
    pub gender: String,
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pets::list,
        crate::routes::pets::create,
        crate::routes::pets::get,
        crate::routes::pets::update,
        crate::routes::pets::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreatePetInputDoc,
            UpdatePetInputDoc,
            PetDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "pets")
    )
)]
pub struct ApiDoc;
