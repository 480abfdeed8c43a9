pub mod handlers;
pub mod routes;

pub use routes::map_routes;
