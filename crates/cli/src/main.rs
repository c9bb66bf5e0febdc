#![warn(clippy::pedantic)]

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use repcycle_domain::{BatchSize, Property, SYNONYMS, Service};
use repcycle_storage::{import, sqlite};

use crate::settings::Settings;

mod log;
mod session;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "repcycle")]
#[command(version)]
#[command(about = "Recommends exercises for a muscle, cycling through the whole catalog")]
struct Cli {
    /// Settings file [default: repcycle.toml]
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Exercise database, overriding the settings file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Number of exercises per recommendation, overriding the settings file
    #[arg(long)]
    batch_size: Option<usize>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Answer requests for exercises interactively (default)
    Recommend,
    /// Add the exercises of a JSON file to the database
    Import {
        /// JSON array of exercises
        file: PathBuf,
    },
    /// List the terms understood in requests
    Muscles,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(database) = cli.database {
        settings.database = database;
    }
    if let Some(batch_size) = cli.batch_size {
        settings.batch_size = batch_size;
    }

    log::init(log::verbosity(settings.log_level, cli.verbose))
        .context("failed to initialize logger")?;

    match cli.command.unwrap_or(Command::Recommend) {
        Command::Recommend => recommend(&settings),
        Command::Import { file } => import_file(&settings, &file),
        Command::Muscles => list_muscles(),
    }
}

fn recommend(settings: &Settings) -> anyhow::Result<()> {
    let batch_size: BatchSize = settings.batch_size()?;
    let catalog = sqlite::Catalog::open(&settings.database)
        .with_context(|| format!("failed to open {}", settings.database.display()))?;
    let service = Service::new(catalog, batch_size);

    session::run(&service, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn import_file(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let catalog = sqlite::Catalog::open(&settings.database)
        .with_context(|| format!("failed to open {}", settings.database.display()))?;
    let summary = import::import(&catalog, &json)
        .with_context(|| format!("failed to import {}", file.display()))?;

    println!(
        "Imported {} exercises, skipped {} existing exercises.",
        summary.imported, summary.skipped
    );
    Ok(())
}

fn list_muscles() -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for (term, muscles) in SYNONYMS {
        writeln!(
            stdout,
            "{term}: {}",
            muscles
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", ")
        )?;
    }
    Ok(())
}
