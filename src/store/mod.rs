//! Entity store: durable storage and uniqueness enforcement for users, characters, planets and favorites.
//!
//! Handlers only see [`EntityStore`]. [`PgStore`] backs production; [`MemoryStore`] keeps the same
//! constraints in process and is used when no `DATABASE_URL` is configured and by the test suite.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::StoreError;
use crate::model::{
    Favorite, FavoriteDetail, FavoriteTarget, NewFavorite, NewPerson, NewPlanet, NewUser, Person,
    Planet, User,
};
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, StoreError>;

/// Every mutation is atomic: it either commits fully or leaves the store untouched.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
    async fn user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn users(&self) -> StoreResult<Vec<User>>;

    async fn insert_person(&self, new: NewPerson) -> StoreResult<Person>;
    async fn person(&self, id: i64) -> StoreResult<Option<Person>>;
    async fn people(&self) -> StoreResult<Vec<Person>>;

    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet>;
    async fn planet(&self, id: i64) -> StoreResult<Option<Planet>>;
    async fn planets(&self) -> StoreResult<Vec<Planet>>;

    /// Fails with `ForeignKeyViolation` when the user or target does not exist.
    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite>;
    /// Favorites of one user joined with their targets, ordered by id.
    async fn favorites_for_user(&self, user_id: i64) -> StoreResult<Vec<FavoriteDetail>>;
    /// Lowest-id favorite of `user_id` pointing at `target`.
    async fn find_favorite(&self, user_id: i64, target: FavoriteTarget) -> StoreResult<Option<Favorite>>;
    /// Returns whether a row was removed.
    async fn delete_favorite(&self, id: i64) -> StoreResult<bool>;
}
