//! User handlers: list, read, register.

use crate::error::AppError;
use crate::extractors::{IdPath, JsonBody};
use crate::model::NewUser;
use crate::password::hash_password;
use crate::response::{created, ok};
use crate::serializer::{self, PublicUser};
use crate::service::CreateUserRequest;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users: Vec<PublicUser> = state.store.users().await?.iter().map(serializer::user).collect();
    Ok(ok(users))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;
    Ok(ok(serializer::user(&user)))
}

/// POST /user
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let registration = body.validate()?;

    if state.store.user_by_username(&registration.username).await?.is_some() {
        return Err(AppError::Duplicate("username already exists".into()));
    }
    if state.store.user_by_email(&registration.email).await?.is_some() {
        return Err(AppError::Duplicate("email already registered".into()));
    }

    let params = state.argon2;
    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, params))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task: {e}")))??;

    let user = state
        .store
        .insert_user(NewUser {
            username: registration.username,
            email: registration.email,
            password_hash,
            is_active: true,
        })
        .await?;
    tracing::info!(user_id = user.id, "user created");
    created("user created", "user", serializer::user(&user))
}
