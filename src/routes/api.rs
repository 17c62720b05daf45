//! Resource routes and the sitemap served at `/`.

use crate::handlers::{
    add_favorite_person, add_favorite_planet, create_person, create_planet, create_user, get_person,
    get_planet, get_user, list_favorites, list_people, list_planets, list_users, remove_favorite_person,
    remove_favorite_planet,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Json, Router};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
}

/// Every resource route, in the order the sitemap lists them.
pub const API_ROUTES: &[RouteInfo] = &[
    RouteInfo { method: "GET", path: "/users" },
    RouteInfo { method: "GET", path: "/users/{id}" },
    RouteInfo { method: "POST", path: "/user" },
    RouteInfo { method: "GET", path: "/people" },
    RouteInfo { method: "POST", path: "/people" },
    RouteInfo { method: "GET", path: "/people/{id}" },
    RouteInfo { method: "GET", path: "/planets" },
    RouteInfo { method: "POST", path: "/planets" },
    RouteInfo { method: "GET", path: "/planets/{id}" },
    RouteInfo { method: "GET", path: "/favorites/{user_id}" },
    RouteInfo { method: "POST", path: "/favorite/people/{id}" },
    RouteInfo { method: "DELETE", path: "/favorite/people/{id}" },
    RouteInfo { method: "POST", path: "/favorite/planet/{id}" },
    RouteInfo { method: "DELETE", path: "/favorite/planet/{id}" },
];

#[derive(Serialize)]
struct Sitemap {
    routes: &'static [RouteInfo],
}

async fn sitemap() -> Json<Sitemap> {
    Json(Sitemap { routes: API_ROUTES })
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(sitemap))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/user", post(create_user))
        .route("/people", get(list_people).post(create_person))
        .route("/people/:id", get(get_person))
        .route("/planets", get(list_planets).post(create_planet))
        .route("/planets/:id", get(get_planet))
        .route("/favorites/:user_id", get(list_favorites))
        .route(
            "/favorite/people/:id",
            post(add_favorite_person).delete(remove_favorite_person),
        )
        .route(
            "/favorite/planet/:id",
            post(add_favorite_planet).delete(remove_favorite_planet),
        )
        .with_state(state)
}
