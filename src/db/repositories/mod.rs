mod participant_repository;
mod profile_repository;
mod training_repository;
mod update_repository;

pub use participant_repository::ParticipantRepository;
pub use profile_repository::ProfileRepository;
pub use training_repository::{ProgramFilter, TrainingRepository};
pub use update_repository::UpdateRepository;
