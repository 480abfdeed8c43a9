pub mod form;
pub mod handlers;
pub mod routes;

pub use form::TrainingProgramForm;
pub use routes::training_routes;
