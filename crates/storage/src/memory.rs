use std::sync::Mutex;

use repcycle_domain::{CatalogRepository, Exercise, Muscle, ReadError, StorageError, WriteError};

use crate::CatalogWriter;

/// Exercise catalog held in memory, in insertion order.
#[derive(Default)]
pub struct Catalog {
    entries: Mutex<Vec<(Exercise, Vec<Muscle>)>>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<(Exercise, Vec<Muscle>)>>, StorageError> {
        self.entries
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))
    }
}

impl FromIterator<(Exercise, Vec<Muscle>)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (Exercise, Vec<Muscle>)>>(iter: T) -> Self {
        Self {
            entries: Mutex::new(iter.into_iter().collect()),
        }
    }
}

impl CatalogRepository for Catalog {
    fn read_exercises(&self, muscle: Muscle) -> Result<Vec<Exercise>, ReadError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|(_, muscles)| muscles.contains(&muscle))
            .map(|(exercise, _)| exercise.clone())
            .collect())
    }
}

impl CatalogWriter for Catalog {
    fn create_exercise(&self, exercise: &Exercise, muscles: &[Muscle]) -> Result<(), WriteError> {
        let mut entries = self.lock()?;

        if entries.iter().any(|(e, _)| e.title == exercise.title) {
            return Err(WriteError::Conflict);
        }

        entries.push((exercise.clone(), muscles.to_vec()));
        Ok(())
    }
}
