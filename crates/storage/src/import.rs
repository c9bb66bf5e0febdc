use log::{info, warn};
use serde::Deserialize;

use repcycle_domain::{
    Exercise, Goal, GoalError, Muscle, MuscleError, Reps, RepsError, Sets, SetsError, Title,
    TitleError, WriteError, distinct,
};

use crate::CatalogWriter;

/// Exercise as it appears in an import file.
///
/// Reps and sets that are not given are derived from the goal.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Record {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub sets: Option<u32>,
    pub muscles: Vec<String>,
}

impl Record {
    pub fn into_entry(self) -> Result<(Exercise, Vec<Muscle>), ImportError> {
        let title = Title::new(&self.title)?;
        let goal = self.goal.as_deref().map(str::parse::<Goal>).transpose()?;
        let (default_reps, default_sets) = Goal::volume_of(goal);
        let reps = self.reps.map(Reps::new).transpose()?.unwrap_or(default_reps);
        let sets = self.sets.map(Sets::new).transpose()?.unwrap_or(default_sets);
        let muscles = self
            .muscles
            .iter()
            .map(|m| m.parse::<Muscle>())
            .collect::<Result<Vec<_>, _>>()?;
        let muscles = distinct(&muscles);

        if muscles.is_empty() {
            return Err(ImportError::NoMuscles(title.to_string()));
        }

        Ok((
            Exercise {
                title,
                description: self.description.trim().to_string(),
                reps,
                sets,
            },
            muscles,
        ))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("invalid import file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Title(#[from] TitleError),
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Reps(#[from] RepsError),
    #[error(transparent)]
    Sets(#[from] SetsError),
    #[error(transparent)]
    Muscle(#[from] MuscleError),
    #[error("exercise \"{0}\" has no muscles")]
    NoMuscles(String),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Parses a JSON array of records.
pub fn parse(json: &str) -> Result<Vec<Record>, ImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Adds all records of a JSON array to the catalog.
///
/// All records are validated before the first one is written. Records whose title exists in the
/// catalog already are skipped.
pub fn import(catalog: &impl CatalogWriter, json: &str) -> Result<Summary, ImportError> {
    let entries = parse(json)?
        .into_iter()
        .map(Record::into_entry)
        .collect::<Result<Vec<_>, _>>()?;
    let mut summary = Summary::default();

    for (exercise, muscles) in &entries {
        match catalog.create_exercise(exercise, muscles) {
            Ok(()) => summary.imported += 1,
            Err(WriteError::Conflict) => {
                warn!("skipped existing exercise \"{}\"", exercise.title);
                summary.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        "imported {} exercises, skipped {}",
        summary.imported, summary.skipped
    );

    Ok(summary)
}
