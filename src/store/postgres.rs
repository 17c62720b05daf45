//! PostgreSQL-backed store. Tables are created on startup with idempotent DDL.

use super::{EntityStore, StoreResult};
use crate::model::{
    Favorite, FavoriteDetail, FavoriteTarget, NewFavorite, NewPerson, NewPlanet, NewUser, Person,
    Planet, User,
};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, FromRow, PgPool};
use std::str::FromStr;

/// Creation order follows foreign-key dependencies.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(25) NOT NULL UNIQUE,
        email VARCHAR(120) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS people (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(120) NOT NULL UNIQUE,
        homeworld VARCHAR(80) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS planets (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(120) NOT NULL UNIQUE,
        climate VARCHAR(80) NOT NULL,
        terrain VARCHAR(80) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorites (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        people_id BIGINT REFERENCES people(id) ON DELETE CASCADE,
        planet_id BIGINT REFERENCES planets(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS favorites_user_id_idx ON favorites (user_id)",
];

const USER_COLUMNS: &str = "id, username, email, password_hash, is_active";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the four tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::info!("database schema ready");
        Ok(())
    }
}

/// Flat row of `favorites LEFT JOIN people LEFT JOIN planets`.
#[derive(FromRow)]
struct FavoriteJoinRow {
    id: i64,
    user_id: i64,
    people_id: Option<i64>,
    planet_id: Option<i64>,
    person_name: Option<String>,
    person_homeworld: Option<String>,
    planet_name: Option<String>,
    planet_climate: Option<String>,
    planet_terrain: Option<String>,
}

impl From<FavoriteJoinRow> for FavoriteDetail {
    fn from(row: FavoriteJoinRow) -> Self {
        let person = match (row.people_id, row.person_name, row.person_homeworld) {
            (Some(id), Some(name), Some(homeworld)) => Some(Person { id, name, homeworld }),
            _ => None,
        };
        let planet = match (row.planet_id, row.planet_name, row.planet_climate, row.planet_terrain) {
            (Some(id), Some(name), Some(climate), Some(terrain)) => Some(Planet {
                id,
                name,
                climate,
                terrain,
            }),
            _ => None,
        };
        FavoriteDetail {
            favorite: Favorite {
                id: row.id,
                user_id: row.user_id,
                people_id: row.people_id,
                planet_id: row.planet_id,
            },
            person,
            planet,
        }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, is_active) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.is_active)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn insert_person(&self, new: NewPerson) -> StoreResult<Person> {
        let mut tx = self.pool.begin().await?;
        let person = sqlx::query_as::<_, Person>(
            "INSERT INTO people (name, homeworld) VALUES ($1, $2) RETURNING id, name, homeworld",
        )
        .bind(&new.name)
        .bind(&new.homeworld)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(person)
    }

    async fn person(&self, id: i64) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>("SELECT id, name, homeworld FROM people WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(person)
    }

    async fn people(&self) -> StoreResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>("SELECT id, name, homeworld FROM people ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(people)
    }

    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        let mut tx = self.pool.begin().await?;
        let planet = sqlx::query_as::<_, Planet>(
            "INSERT INTO planets (name, climate, terrain) VALUES ($1, $2, $3) RETURNING id, name, climate, terrain",
        )
        .bind(&new.name)
        .bind(&new.climate)
        .bind(&new.terrain)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(planet)
    }

    async fn planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        let planet = sqlx::query_as::<_, Planet>("SELECT id, name, climate, terrain FROM planets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(planet)
    }

    async fn planets(&self) -> StoreResult<Vec<Planet>> {
        let planets = sqlx::query_as::<_, Planet>("SELECT id, name, climate, terrain FROM planets ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(planets)
    }

    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite> {
        let mut tx = self.pool.begin().await?;
        let favorite = sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, people_id, planet_id) VALUES ($1, $2, $3) RETURNING id, user_id, people_id, planet_id",
        )
        .bind(new.user_id)
        .bind(new.target.people_id())
        .bind(new.target.planet_id())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(favorite)
    }

    async fn favorites_for_user(&self, user_id: i64) -> StoreResult<Vec<FavoriteDetail>> {
        let rows = sqlx::query_as::<_, FavoriteJoinRow>(
            r#"
            SELECT f.id, f.user_id, f.people_id, f.planet_id,
                   p.name AS person_name, p.homeworld AS person_homeworld,
                   pl.name AS planet_name, pl.climate AS planet_climate, pl.terrain AS planet_terrain
            FROM favorites f
            LEFT JOIN people p ON p.id = f.people_id
            LEFT JOIN planets pl ON pl.id = f.planet_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FavoriteDetail::from).collect())
    }

    async fn find_favorite(&self, user_id: i64, target: FavoriteTarget) -> StoreResult<Option<Favorite>> {
        let column = match target {
            FavoriteTarget::Person(_) => "people_id",
            FavoriteTarget::Planet(_) => "planet_id",
        };
        let favorite = sqlx::query_as::<_, Favorite>(&format!(
            "SELECT id, user_id, people_id, planet_id FROM favorites WHERE user_id = $1 AND {} = $2 ORDER BY id LIMIT 1",
            column
        ))
        .bind(user_id)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> StoreResult<()> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name else {
        return Ok(());
    };
    let mut conn = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connection options for the `postgres` maintenance database on the same server, plus the
/// database named by `database_url` when it is one that may need creating.
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), sqlx::Error> {
    let opts = PgConnectOptions::from_str(database_url)?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(str::to_owned);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
