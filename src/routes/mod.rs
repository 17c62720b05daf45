pub mod api;
pub mod common;

pub use api::{api_routes, RouteInfo, API_ROUTES};
pub use common::common_routes;
