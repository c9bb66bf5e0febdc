use crate::{Exercise, Muscle, Property, ReadError};

/// Answers free-text requests for exercises.
///
/// A request naming more than one muscle is answered with [`Recommendation::Choose`]. The caller
/// then picks one of the offered muscles and passes it to [`RecommendationService::choose`].
pub trait RecommendationService {
    fn recommend(&self, request: &str) -> Result<Recommendation, ReadError>;
    fn choose(&self, offered: &[Muscle], answer: &str) -> Result<Recommendation, ReadError>;
    fn exercises(&self, muscle: Muscle) -> Result<Recommendation, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// The request mentions no known muscle.
    NoMuscleFound,
    /// The request mentions several muscles, one of which must be chosen.
    Choose(Vec<Muscle>),
    /// The answer to [`Recommendation::Choose`] was none of the offered muscles.
    InvalidChoice(Vec<Muscle>),
    Exercises(Vec<Exercise>),
    /// The catalog holds no exercise for the muscle.
    NoExercisesFound,
}

impl From<Vec<Exercise>> for Recommendation {
    fn from(value: Vec<Exercise>) -> Self {
        if value.is_empty() {
            Recommendation::NoExercisesFound
        } else {
            Recommendation::Exercises(value)
        }
    }
}

/// Finds the offered muscle whose name equals the answer.
#[must_use]
pub fn choice(offered: &[Muscle], answer: &str) -> Option<Muscle> {
    offered.iter().copied().find(|m| m.name() == answer)
}
