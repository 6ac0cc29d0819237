use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::pet::repository::PetRepository;
use service::pet::service::PetService;

use crate::openapi::ApiDoc;

pub mod pets;

#[derive(Clone)]
pub struct ServerState {
    pub pets: Arc<PetService<dyn PetRepository>>,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service healthy"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: pet CRUD, health, and API docs.
/// Routes are registered with and without trailing slash.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/pets", get(pets::list).post(pets::create))
        .route("/pets/", get(pets::list).post(pets::create))
        .route("/pets/:id", get(pets::get).put(pets::update).delete(pets::delete))
        .route("/pets/:id/", get(pets::get).put(pets::update).delete(pets::delete))
        .route("/health", get(health))
        .with_state(state);

    api.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
