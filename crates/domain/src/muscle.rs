use std::{fmt, slice::Iter, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::Property;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Muscle {
    Neck,
    Chest,
    Back,
    Lats,
    Traps,
    Shoulders,
    Deltoids,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Glutes,
    Quadriceps,
    Hamstrings,
    Calves,
}

impl Property for Muscle {
    fn iter() -> Iter<'static, Muscle> {
        static MUSCLES: [Muscle; 15] = [
            Muscle::Neck,
            Muscle::Chest,
            Muscle::Back,
            Muscle::Lats,
            Muscle::Traps,
            Muscle::Shoulders,
            Muscle::Deltoids,
            Muscle::Biceps,
            Muscle::Triceps,
            Muscle::Forearms,
            Muscle::Core,
            Muscle::Glutes,
            Muscle::Quadriceps,
            Muscle::Hamstrings,
            Muscle::Calves,
        ];
        MUSCLES.iter()
    }

    /// Canonical name, used as the catalog key.
    fn name(self) -> &'static str {
        match self {
            Muscle::Neck => "neck",
            Muscle::Chest => "chest",
            Muscle::Back => "back",
            Muscle::Lats => "lats",
            Muscle::Traps => "traps",
            Muscle::Shoulders => "shoulders",
            Muscle::Deltoids => "deltoids",
            Muscle::Biceps => "biceps",
            Muscle::Triceps => "triceps",
            Muscle::Forearms => "forearms",
            Muscle::Core => "core",
            Muscle::Glutes => "glutes",
            Muscle::Quadriceps => "quadriceps",
            Muscle::Hamstrings => "hamstrings",
            Muscle::Calves => "calves",
        }
    }
}

impl Muscle {
    #[must_use]
    pub fn description(self) -> &'static str {
        #[allow(clippy::match_same_arms)]
        match self {
            Muscle::Neck => "",
            Muscle::Chest => "Pecs",
            Muscle::Back => "Lower and middle back",
            Muscle::Lats => "Sides of back",
            Muscle::Traps => "Upper back",
            Muscle::Shoulders => "",
            Muscle::Deltoids => "Front, side and rear delts",
            Muscle::Biceps => "Front of upper arms",
            Muscle::Triceps => "Back of upper arms",
            Muscle::Forearms => "",
            Muscle::Core => "Abs and obliques",
            Muscle::Glutes => "Buttocks",
            Muscle::Quadriceps => "Front of thighs",
            Muscle::Hamstrings => "Back of thighs",
            Muscle::Calves => "Back of lower legs",
        }
    }
}

impl fmt::Display for Muscle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Muscle {
    type Err = MuscleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Muscle::iter()
            .find(|m| m.name() == name)
            .copied()
            .ok_or_else(|| MuscleError::Invalid(s.trim().to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleError {
    #[error("Invalid muscle \"{0}\"")]
    Invalid(String),
}

/// User-facing terms and the muscles they stand for, in matching order.
pub const SYNONYMS: [(&str, &[Muscle]); 17] = [
    ("arms", &[Muscle::Biceps, Muscle::Triceps, Muscle::Forearms]),
    (
        "legs",
        &[
            Muscle::Quadriceps,
            Muscle::Hamstrings,
            Muscle::Glutes,
            Muscle::Calves,
        ],
    ),
    ("chest", &[Muscle::Chest]),
    ("back", &[Muscle::Back]),
    ("shoulders", &[Muscle::Shoulders, Muscle::Deltoids]),
    ("core", &[Muscle::Core]),
    ("abs", &[Muscle::Core]),
    ("biceps", &[Muscle::Biceps]),
    ("triceps", &[Muscle::Triceps]),
    ("forearms", &[Muscle::Forearms]),
    ("quadriceps", &[Muscle::Quadriceps]),
    ("hamstrings", &[Muscle::Hamstrings]),
    ("glutes", &[Muscle::Glutes]),
    ("calves", &[Muscle::Calves]),
    ("lats", &[Muscle::Lats]),
    ("traps", &[Muscle::Traps]),
    ("deltoids", &[Muscle::Deltoids]),
];

static PATTERNS: LazyLock<Vec<(Regex, &'static [Muscle])>> = LazyLock::new(|| {
    SYNONYMS
        .iter()
        .filter_map(|(term, muscles)| pattern(term).map(|pattern| (pattern, *muscles)))
        .collect()
});

/// Matches `term` as a whole word, or as a whole phrase if it consists of several words.
fn pattern(term: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(term))).ok()
}

/// Maps free text to the muscles of every synonym occurring in it as a whole word.
///
/// The result keeps the order of the synonym table and may contain duplicates.
/// An empty result means that no relevant muscle was mentioned.
#[must_use]
pub fn resolve(request: &str) -> Vec<Muscle> {
    let request = request.to_lowercase();
    PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(&request))
        .flat_map(|(_, muscles)| muscles.iter().copied())
        .collect()
}

/// Removes repeated muscles, keeping the first occurrence of each.
#[must_use]
pub fn distinct(muscles: &[Muscle]) -> Vec<Muscle> {
    let mut result = Vec::with_capacity(muscles.len());
    for muscle in muscles {
        if !result.contains(muscle) {
            result.push(*muscle);
        }
    }
    result
}
