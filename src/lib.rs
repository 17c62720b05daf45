//! Star Wars API: users, characters, planets and favorites over HTTP/JSON.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod password;
pub mod response;
pub mod routes;
pub mod serializer;
pub mod service;
pub mod state;
pub mod store;

pub use app::{build_app, App};
pub use config::Config;
pub use error::{AppError, ConfigError, StoreError};
pub use password::Argon2Params;
pub use state::AppState;
pub use store::{ensure_database_exists, EntityStore, MemoryStore, PgStore};
