//! In-process store with the same uniqueness and foreign-key rules as the PostgreSQL schema.

use super::{EntityStore, StoreResult};
use crate::error::StoreError;
use crate::model::{
    Favorite, FavoriteDetail, FavoriteTarget, NewFavorite, NewPerson, NewPlanet, NewUser, Person,
    Planet, User,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    people: BTreeMap<i64, Person>,
    planets: BTreeMap<i64, Planet>,
    favorites: BTreeMap<i64, Favorite>,
    next_user_id: i64,
    next_person_id: i64,
    next_planet_id: i64,
    next_favorite_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Each operation holds the lock for its whole check-then-write, so a failed write changes nothing.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::UniqueViolation { field: "username" });
        }
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation { field: "email" });
        }
        let user = User {
            id: next_id(&mut t.next_user_id),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            is_active: new.is_active,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn insert_person(&self, new: NewPerson) -> StoreResult<Person> {
        let mut t = self.tables.write().await;
        if t.people.values().any(|p| p.name == new.name) {
            return Err(StoreError::UniqueViolation { field: "name" });
        }
        let person = Person {
            id: next_id(&mut t.next_person_id),
            name: new.name,
            homeworld: new.homeworld,
        };
        t.people.insert(person.id, person.clone());
        Ok(person)
    }

    async fn person(&self, id: i64) -> StoreResult<Option<Person>> {
        Ok(self.tables.read().await.people.get(&id).cloned())
    }

    async fn people(&self) -> StoreResult<Vec<Person>> {
        Ok(self.tables.read().await.people.values().cloned().collect())
    }

    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        let mut t = self.tables.write().await;
        if t.planets.values().any(|p| p.name == new.name) {
            return Err(StoreError::UniqueViolation { field: "name" });
        }
        let planet = Planet {
            id: next_id(&mut t.next_planet_id),
            name: new.name,
            climate: new.climate,
            terrain: new.terrain,
        };
        t.planets.insert(planet.id, planet.clone());
        Ok(planet)
    }

    async fn planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        Ok(self.tables.read().await.planets.get(&id).cloned())
    }

    async fn planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.tables.read().await.planets.values().cloned().collect())
    }

    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&new.user_id) {
            return Err(StoreError::ForeignKeyViolation("favorites_user_id_fkey".into()));
        }
        let target_exists = match new.target {
            FavoriteTarget::Person(id) => t.people.contains_key(&id),
            FavoriteTarget::Planet(id) => t.planets.contains_key(&id),
        };
        if !target_exists {
            let constraint = match new.target {
                FavoriteTarget::Person(_) => "favorites_people_id_fkey",
                FavoriteTarget::Planet(_) => "favorites_planet_id_fkey",
            };
            return Err(StoreError::ForeignKeyViolation(constraint.into()));
        }
        let favorite = Favorite {
            id: next_id(&mut t.next_favorite_id),
            user_id: new.user_id,
            people_id: new.target.people_id(),
            planet_id: new.target.planet_id(),
        };
        t.favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn favorites_for_user(&self, user_id: i64) -> StoreResult<Vec<FavoriteDetail>> {
        let t = self.tables.read().await;
        let details = t
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| FavoriteDetail {
                favorite: f.clone(),
                person: f.people_id.and_then(|id| t.people.get(&id).cloned()),
                planet: f.planet_id.and_then(|id| t.planets.get(&id).cloned()),
            })
            .collect();
        Ok(details)
    }

    async fn find_favorite(&self, user_id: i64, target: FavoriteTarget) -> StoreResult<Option<Favorite>> {
        let t = self.tables.read().await;
        let found = t.favorites.values().find(|f| {
            f.user_id == user_id
                && match target {
                    FavoriteTarget::Person(id) => f.people_id == Some(id),
                    FavoriteTarget::Planet(id) => f.planet_id == Some(id),
                }
        });
        Ok(found.cloned())
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.favorites.remove(&id).is_some())
    }
}
