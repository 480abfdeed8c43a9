pub mod handlers;
pub mod routes;

pub use routes::participant_routes;
