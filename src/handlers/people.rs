//! Character handlers (`people` table).

use crate::error::{AppError, StoreError};
use crate::extractors::{IdPath, JsonBody};
use crate::response::{created, ok};
use crate::serializer::{self, PublicPerson};
use crate::service::CreatePersonRequest;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /people
pub async fn list_people(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let people: Vec<PublicPerson> = state.store.people().await?.iter().map(serializer::person).collect();
    Ok(ok(people))
}

/// GET /people/:id
pub async fn get_person(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let person = state
        .store
        .person(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("character {} not found", id)))?;
    Ok(ok(serializer::person(&person)))
}

/// POST /people
pub async fn create_person(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePersonRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = body.validate()?;
    let name = new.name.clone();
    let person = state.store.insert_person(new).await.map_err(|e| match e {
        StoreError::UniqueViolation { .. } => {
            AppError::Duplicate(format!("a character named '{}' already exists", name))
        }
        other => other.into(),
    })?;
    tracing::info!(person_id = person.id, "character created");
    created("character created", "character", serializer::person(&person))
}
