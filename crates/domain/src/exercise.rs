use std::{slice::Iter, str::FromStr};

use derive_more::{AsRef, Deref, Display};

use crate::{Muscle, Property, ReadError};

/// Read-only access to the exercises of the catalog.
pub trait CatalogRepository {
    /// Returns all exercises tagged with the given muscle.
    fn read_exercises(&self, muscle: Muscle) -> Result<Vec<Exercise>, ReadError>;
}

impl<R: CatalogRepository + ?Sized> CatalogRepository for &R {
    fn read_exercises(&self, muscle: Muscle) -> Result<Vec<Exercise>, ReadError> {
        (**self).read_exercises(muscle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exercise {
    pub title: Title,
    pub description: String,
    pub reps: Reps,
    pub sets: Sets,
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(String);

impl Title {
    pub fn new(title: &str) -> Result<Self, TitleError> {
        let trimmed_title = title.trim();

        if trimmed_title.is_empty() {
            return Err(TitleError::Empty);
        }

        let len = trimmed_title.chars().count();

        if len > 256 {
            return Err(TitleError::TooLong(len));
        }

        Ok(Title(trimmed_title.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TitleError {
    #[error("Title must not be empty")]
    Empty,
    #[error("Title must be 256 characters or fewer ({0} > 256)")]
    TooLong(usize),
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value == 0 {
            return Err(RepsError::Zero);
        }
        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be greater than 0")]
    Zero,
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        if value == 0 {
            return Err(SetsError::Zero);
        }
        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be greater than 0")]
    Zero,
}

/// Physique goal of an exercise, determining its default volume.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Goal {
    Strength,
    Plyometrics,
    Cardio,
    Stretching,
    Powerlifting,
    Strongman,
    OlympicWeightlifting,
}

impl Property for Goal {
    fn iter() -> Iter<'static, Goal> {
        static GOALS: [Goal; 7] = [
            Goal::Strength,
            Goal::Plyometrics,
            Goal::Cardio,
            Goal::Stretching,
            Goal::Powerlifting,
            Goal::Strongman,
            Goal::OlympicWeightlifting,
        ];
        GOALS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Goal::Strength => "Strength",
            Goal::Plyometrics => "Plyometrics",
            Goal::Cardio => "Cardio",
            Goal::Stretching => "Stretching",
            Goal::Powerlifting => "Powerlifting",
            Goal::Strongman => "Strongman",
            Goal::OlympicWeightlifting => "Olympic Weightlifting",
        }
    }
}

impl Goal {
    pub const DEFAULT_VOLUME: (Reps, Sets) = (Reps(6), Sets(3));

    #[must_use]
    pub fn volume(self) -> (Reps, Sets) {
        match self {
            Goal::Strength => (Reps(4), Sets(5)),
            Goal::Plyometrics => (Reps(8), Sets(4)),
            Goal::Cardio => (Reps(20), Sets(1)),
            Goal::Stretching => (Reps(30), Sets(3)),
            Goal::Powerlifting => (Reps(3), Sets(5)),
            Goal::Strongman => (Reps(6), Sets(4)),
            Goal::OlympicWeightlifting => (Reps(2), Sets(6)),
        }
    }

    /// Volume of an optional goal, falling back to a moderate default.
    #[must_use]
    pub fn volume_of(goal: Option<Goal>) -> (Reps, Sets) {
        goal.map_or(Self::DEFAULT_VOLUME, Goal::volume)
    }
}

impl FromStr for Goal {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Goal::iter()
            .find(|g| g.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| GoalError::Invalid(name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GoalError {
    #[error("Invalid goal \"{0}\"")]
    Invalid(String),
}
