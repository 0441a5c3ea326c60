pub mod artifacts;
pub mod error;

pub use artifacts::ArtifactStore;
pub use error::{AppError, AppResult};
