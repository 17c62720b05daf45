//! Request body schemas and their validation into typed inputs.
//!
//! Every field is optional at the deserialization layer so that a missing field is reported as
//! `MissingField` (naming all of them) rather than as a JSON shape error.

use crate::error::AppError;
use crate::model::{NewPerson, NewPlanet};
use serde::Deserialize;

/// Absent, `null` and blank strings all count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Column widths of the `VARCHAR` columns, in characters.
pub const USERNAME_MAX: usize = 25;
pub const EMAIL_MAX: usize = 120;
pub const NAME_MAX: usize = 120;
pub const HOMEWORLD_MAX: usize = 80;
pub const CLIMATE_MAX: usize = 80;
pub const TERRAIN_MAX: usize = 80;

/// First field longer than its column allows.
fn check_lengths(fields: &[(&'static str, &str, usize)]) -> Result<(), AppError> {
    match fields.iter().find(|(_, value, max)| value.chars().count() > *max) {
        Some((name, _, max)) => Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            name, max
        ))),
        None => Ok(()),
    }
}

fn missing(fields: &[(&'static str, bool)]) -> AppError {
    AppError::MissingField(
        fields
            .iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| *name)
            .collect(),
    )
}

/// Body of `POST /user`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated user registration; the password is still plaintext here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<UserRegistration, AppError> {
        match (present(self.username), present(self.email), present(self.password)) {
            (Some(username), Some(email), Some(password)) => {
                check_lengths(&[("username", &username, USERNAME_MAX), ("email", &email, EMAIL_MAX)])?;
                Ok(UserRegistration {
                    username,
                    email,
                    password,
                })
            }
            (username, email, password) => Err(missing(&[
                ("username", username.is_none()),
                ("email", email.is_none()),
                ("password", password.is_none()),
            ])),
        }
    }
}

/// Body of `POST /people`.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePersonRequest {
    pub name: Option<String>,
    pub homeworld: Option<String>,
}

impl CreatePersonRequest {
    pub fn validate(self) -> Result<NewPerson, AppError> {
        match (present(self.name), present(self.homeworld)) {
            (Some(name), Some(homeworld)) => {
                check_lengths(&[("name", &name, NAME_MAX), ("homeworld", &homeworld, HOMEWORLD_MAX)])?;
                Ok(NewPerson { name, homeworld })
            }
            (name, homeworld) => Err(missing(&[
                ("name", name.is_none()),
                ("homeworld", homeworld.is_none()),
            ])),
        }
    }
}

/// Body of `POST /planets`.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePlanetRequest {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

impl CreatePlanetRequest {
    pub fn validate(self) -> Result<NewPlanet, AppError> {
        match (present(self.name), present(self.climate), present(self.terrain)) {
            (Some(name), Some(climate), Some(terrain)) => {
                check_lengths(&[
                    ("name", &name, NAME_MAX),
                    ("climate", &climate, CLIMATE_MAX),
                    ("terrain", &terrain, TERRAIN_MAX),
                ])?;
                Ok(NewPlanet {
                    name,
                    climate,
                    terrain,
                })
            }
            (name, climate, terrain) => Err(missing(&[
                ("name", name.is_none()),
                ("climate", climate.is_none()),
                ("terrain", terrain.is_none()),
            ])),
        }
    }
}

/// Body of the favorite add/remove routes.
#[derive(Debug, Default, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Option<i64>,
}

impl FavoriteRequest {
    /// `0` is not a valid user id and counts as missing.
    pub fn validate(self) -> Result<i64, AppError> {
        match self.user_id {
            Some(id) if id != 0 => Ok(id),
            _ => Err(AppError::MissingField(vec!["user_id"])),
        }
    }
}
