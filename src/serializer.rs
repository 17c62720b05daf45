//! Public JSON representations of stored rows.

use crate::model::{FavoriteDetail, Person, Planet, User};
use serde::Serialize;

/// Public user. There is no password field to leak.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicPerson {
    pub id: i64,
    pub name: String,
    pub homeworld: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicPlanet {
    pub id: i64,
    pub name: String,
    pub climate: String,
    pub terrain: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicFavorite {
    pub id: i64,
    pub user_id: i64,
    pub character: Option<PublicPerson>,
    pub planet: Option<PublicPlanet>,
}

pub fn user(u: &User) -> PublicUser {
    PublicUser {
        id: u.id,
        username: u.username.clone(),
        email: u.email.clone(),
        is_active: u.is_active,
    }
}

pub fn person(p: &Person) -> PublicPerson {
    PublicPerson {
        id: p.id,
        name: p.name.clone(),
        homeworld: p.homeworld.clone(),
    }
}

pub fn planet(p: &Planet) -> PublicPlanet {
    PublicPlanet {
        id: p.id,
        name: p.name.clone(),
        climate: p.climate.clone(),
        terrain: p.terrain.clone(),
    }
}

/// Nests the referenced character or planet only when its foreign key is set.
pub fn favorite(detail: &FavoriteDetail) -> PublicFavorite {
    let fav = &detail.favorite;
    PublicFavorite {
        id: fav.id,
        user_id: fav.user_id,
        character: fav
            .people_id
            .and(detail.person.as_ref())
            .map(person),
        planet: fav
            .planet_id
            .and(detail.planet.as_ref())
            .map(planet),
    }
}
