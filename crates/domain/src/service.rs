use log::{debug, error};

use crate::{
    BatchSize, CatalogRepository, Muscle, ReadError, Recommendation, RecommendationService,
    RotationEngine, choice, distinct, resolve,
};

pub struct Service<R> {
    rotation: RotationEngine<R>,
    batch_size: BatchSize,
}

impl<R: CatalogRepository> Service<R> {
    pub fn new(repository: R, batch_size: BatchSize) -> Self {
        Self::with_rotation(RotationEngine::new(repository), batch_size)
    }

    pub fn with_rotation(rotation: RotationEngine<R>, batch_size: BatchSize) -> Self {
        Self {
            rotation,
            batch_size,
        }
    }
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: expr) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                ReadError::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: CatalogRepository> RecommendationService for Service<R> {
    fn recommend(&self, request: &str) -> Result<Recommendation, ReadError> {
        let muscles = distinct(&resolve(request));

        match muscles.as_slice() {
            [] => {
                debug!("no muscle found in request \"{request}\"");
                Ok(Recommendation::NoMuscleFound)
            }
            [muscle] => self.exercises(*muscle),
            _ => Ok(Recommendation::Choose(muscles)),
        }
    }

    fn choose(&self, offered: &[Muscle], answer: &str) -> Result<Recommendation, ReadError> {
        match choice(offered, answer) {
            Some(muscle) => self.exercises(muscle),
            None => Ok(Recommendation::InvalidChoice(offered.to_vec())),
        }
    }

    fn exercises(&self, muscle: Muscle) -> Result<Recommendation, ReadError> {
        let exercises = log_on_error!(
            self.rotation.next_batch(muscle, self.batch_size),
            "get",
            format!("{muscle} exercises")
        )?;
        Ok(Recommendation::from(exercises))
    }
}
