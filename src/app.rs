//! Router assembly: resource and common routes plus the HTTP middleware stack.

use crate::error::AppError;
use crate::routes::{api_routes, common_routes};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// The complete service. Trailing slashes are trimmed before routing, so `/users/` hits `/users`.
pub type App = NormalizePath<Router>;

async fn fallback() -> AppError {
    AppError::NotFound("route not found".into())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Bodies over `body_limit_bytes` are rejected by the JSON extractor with a 413 envelope.

pub fn build_app(state: AppState, body_limit_bytes: usize) -> App {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(api_routes(state))
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
