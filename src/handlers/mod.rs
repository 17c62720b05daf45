//! HTTP handlers for users, characters, planets and favorites.

pub mod favorites;
pub mod people;
pub mod planets;
pub mod users;
pub use favorites::*;
pub use people::*;
pub use planets::*;
pub use users::*;
