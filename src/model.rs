//! Stored rows and validated inputs for users, characters, planets and favorites.

use sqlx::FromRow;

/// A user row. `password_hash` is an Argon2 PHC string and never leaves the server.
#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// A character row (`people` table).
#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub homeworld: String,
}

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub climate: String,
    pub terrain: String,
}

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub people_id: Option<i64>,
    pub planet_id: Option<i64>,
}

/// A favorite joined with whichever character or planet it references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FavoriteDetail {
    pub favorite: Favorite,
    pub person: Option<Person>,
    pub planet: Option<Planet>,
}

/// What a favorite points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavoriteTarget {
    Person(i64),
    Planet(i64),
}

impl FavoriteTarget {
    pub fn id(self) -> i64 {
        match self {
            FavoriteTarget::Person(id) | FavoriteTarget::Planet(id) => id,
        }
    }

    pub fn people_id(self) -> Option<i64> {
        match self {
            FavoriteTarget::Person(id) => Some(id),
            FavoriteTarget::Planet(_) => None,
        }
    }

    pub fn planet_id(self) -> Option<i64> {
        match self {
            FavoriteTarget::Planet(id) => Some(id),
            FavoriteTarget::Person(_) => None,
        }
    }
}

/// Validated input for a user insert; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct NewPerson {
    pub name: String,
    pub homeworld: String,
}

#[derive(Clone, Debug)]
pub struct NewPlanet {
    pub name: String,
    pub climate: String,
    pub terrain: String,
}

#[derive(Clone, Copy, Debug)]
pub struct NewFavorite {
    pub user_id: i64,
    pub target: FavoriteTarget,
}
