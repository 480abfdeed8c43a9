pub mod handlers;
pub mod routes;

pub use routes::{dashboard_api_routes, dashboard_page_routes};
