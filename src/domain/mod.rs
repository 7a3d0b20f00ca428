pub mod error;
pub mod model;

pub use error::FetchError;
pub use model::{KnownFiles, SavedImage};
