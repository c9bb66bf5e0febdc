use std::{
    io,
    path::{Path, PathBuf},
};

use ::log::LevelFilter;
use repcycle_domain::{BatchSize, BatchSizeError};

pub const DEFAULT_PATH: &str = "repcycle.toml";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database: PathBuf,
    pub batch_size: usize,
    #[serde(with = "LevelFilterDef")]
    pub log_level: LevelFilter,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(remote = "LevelFilter", rename_all = "lowercase")]
enum LevelFilterDef {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("workout_data.db"),
            batch_size: *BatchSize::DEFAULT,
            log_level: LevelFilter::Warn,
        }
    }
}

impl Settings {
    /// Reads the settings from `path`, or from [`DEFAULT_PATH`] if no path is given.
    ///
    /// A missing default file yields the default settings.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_PATH), false),
        };

        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                Ok(Settings::default())
            }
            Err(err) => Err(Error::Io(path.to_path_buf(), err)),
        }
    }

    pub fn batch_size(&self) -> Result<BatchSize, BatchSizeError> {
        BatchSize::new(self.batch_size)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read settings file: {1}")]
    Io(PathBuf, io::Error),
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
}
