//! Planet handlers.

use crate::error::{AppError, StoreError};
use crate::extractors::{IdPath, JsonBody};
use crate::response::{created, ok};
use crate::serializer::{self, PublicPlanet};
use crate::service::CreatePlanetRequest;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /planets
pub async fn list_planets(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let planets: Vec<PublicPlanet> = state.store.planets().await?.iter().map(serializer::planet).collect();
    Ok(ok(planets))
}

/// GET /planets/:id
pub async fn get_planet(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let planet = state
        .store
        .planet(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("planet {} not found", id)))?;
    Ok(ok(serializer::planet(&planet)))
}

/// POST /planets
pub async fn create_planet(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePlanetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = body.validate()?;
    let name = new.name.clone();
    let planet = state.store.insert_planet(new).await.map_err(|e| match e {
        StoreError::UniqueViolation { .. } => {
            AppError::Duplicate(format!("a planet named '{}' already exists", name))
        }
        other => other.into(),
    })?;
    tracing::info!(planet_id = planet.id, "planet created");
    created("planet created", "planet", serializer::planet(&planet))
}
