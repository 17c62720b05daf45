//! Shared application state for all routes.

use crate::password::Argon2Params;
use crate::store::EntityStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub argon2: Argon2Params,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        AppState {
            store,
            argon2: Argon2Params::default(),
        }
    }

    pub fn with_argon2(mut self, params: Argon2Params) -> Self {
        self.argon2 = params;
        self
    }
}
