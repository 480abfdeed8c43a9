pub mod handlers;
pub mod routes;

pub use routes::update_routes;
