mod participant;
mod profile;
mod training_metric;
mod training_program;
mod training_update;

pub use participant::*;
pub use profile::*;
pub use training_metric::*;
pub use training_program::*;
pub use training_update::*;
