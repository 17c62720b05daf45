//! Favorite handlers: list per user, add and remove a character or planet.

use crate::error::AppError;
use crate::extractors::{IdPath, JsonBody};
use crate::model::{FavoriteDetail, FavoriteTarget, NewFavorite};
use crate::response::{created, deleted, ok};
use crate::serializer::{self, PublicFavorite};
use crate::service::FavoriteRequest;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /favorites/:user_id
pub async fn list_favorites(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    if state.store.user(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("user {} not found", user_id)));
    }
    let favorites: Vec<PublicFavorite> = state
        .store
        .favorites_for_user(user_id)
        .await?
        .iter()
        .map(serializer::favorite)
        .collect();
    if favorites.is_empty() {
        return Err(AppError::NotFound(format!("no favorites found for user {}", user_id)));
    }
    Ok(ok(favorites))
}

/// POST /favorite/people/:id
pub async fn add_favorite_person(
    State(state): State<AppState>,
    IdPath(people_id): IdPath,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = body.validate()?;
    add_favorite(&state, user_id, FavoriteTarget::Person(people_id)).await
}

/// DELETE /favorite/people/:id
pub async fn remove_favorite_person(
    State(state): State<AppState>,
    IdPath(people_id): IdPath,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = body.validate()?;
    remove_favorite(&state, user_id, FavoriteTarget::Person(people_id)).await
}

/// POST /favorite/planet/:id
pub async fn add_favorite_planet(
    State(state): State<AppState>,
    IdPath(planet_id): IdPath,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = body.validate()?;
    add_favorite(&state, user_id, FavoriteTarget::Planet(planet_id)).await
}

/// DELETE /favorite/planet/:id
pub async fn remove_favorite_planet(
    State(state): State<AppState>,
    IdPath(planet_id): IdPath,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = body.validate()?;
    remove_favorite(&state, user_id, FavoriteTarget::Planet(planet_id)).await
}

/// The user is resolved before the target, so an unknown user wins over an unknown target.
async fn add_favorite(
    state: &AppState,
    user_id: i64,
    target: FavoriteTarget,
) -> Result<impl IntoResponse, AppError> {
    if state.store.user(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("user {} not found", user_id)));
    }
    let (person, planet) = match target {
        FavoriteTarget::Person(id) => {
            let person = state
                .store
                .person(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("character {} not found", id)))?;
            (Some(person), None)
        }
        FavoriteTarget::Planet(id) => {
            let planet = state
                .store
                .planet(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("planet {} not found", id)))?;
            (None, Some(planet))
        }
    };

    let favorite = state.store.insert_favorite(NewFavorite { user_id, target }).await?;
    tracing::info!(favorite_id = favorite.id, user_id, ?target, "favorite added");

    let message = match target {
        FavoriteTarget::Person(_) => "character added to favorites",
        FavoriteTarget::Planet(_) => "planet added to favorites",
    };
    let detail = FavoriteDetail {
        favorite,
        person,
        planet,
    };
    created(message, "favorite", serializer::favorite(&detail))
}

async fn remove_favorite(
    state: &AppState,
    user_id: i64,
    target: FavoriteTarget,
) -> Result<impl IntoResponse, AppError> {
    let favorite = state
        .store
        .find_favorite(user_id, target)
        .await?
        .ok_or_else(|| AppError::NotFound("favorite not found".into()))?;
    if !state.store.delete_favorite(favorite.id).await? {
        return Err(AppError::NotFound("favorite not found".into()));
    }
    tracing::info!(favorite_id = favorite.id, user_id, ?target, "favorite removed");
    Ok(deleted(format!("favorite with ID {} has been removed", target.id())))
}
