#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use repcycle_domain::{Exercise, Muscle, StorageError, WriteError};

pub mod import;
pub mod memory;
pub mod sqlite;


/// Adds exercises to a catalog.
pub trait CatalogWriter {
    /// Stores an exercise tagged with the given muscles.
    ///
    /// Fails with [`WriteError::Conflict`] if an exercise with the same title exists already.
    fn create_exercise(&self, exercise: &Exercise, muscles: &[Muscle]) -> Result<(), WriteError>;
}

fn storage_error(err: impl std::error::Error + Send + Sync + 'static) -> StorageError {
    StorageError::Other(Box::new(err))
}
