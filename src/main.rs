//! `anim-migrate` entry point.
//!
//! Moves the game's animation packs forward through the schema versions.
//!
//! # Running
//!
//! ```sh
//! # Run the v1 -> v2 step over animations/_{bnuuy,shooter,stabber}.json
//! anim-migrate step v2
//!
//! # Run it over a single pack
//! anim-migrate step v2 bnuuy.json
//!
//! # Take one file from v1 all the way to v5
//! anim-migrate chain --from v1 --to v5 --input old.json --output new.json
//! ```
//!
//! Settings are read from `./migrate.ini` when present; see
//! [`anim_migrate::config`] for the format.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anim_migrate::config::{DEFAULT_CONFIG_PATH, MigrateConfig};
use anim_migrate::error::{MigrateError, Result};
use anim_migrate::jobs::{MigrationJob, run_job};
use anim_migrate::pipeline::Pipeline;
use anim_migrate::steps::step_for;
use anim_migrate::storage::{read_pack, write_pack};
use anim_migrate::version::SchemaVersion;
use clap::{Parser, Subcommand};
use log::{error, info};

/// Migrate animation packs between schema versions.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// INI file with the atlas table and file lists.
    /// Defaults to ./migrate.ini when it exists.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing `animations/` and `assets/`.
    /// Overrides the configured root.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the step producing VERSION. Each file is read from
    /// `<category>/_<file>` and written to `<category>/<file>`.
    Step {
        /// Schema version the step produces (v2..v5)
        version: SchemaVersion,
        /// Packs to migrate instead of the configured ones
        files: Vec<String>,
    },
    /// Migrate one file through several steps in memory.
    Chain {
        /// Version of the input pack
        #[arg(long, value_name = "VERSION")]
        from: SchemaVersion,
        /// Version to migrate to
        #[arg(long, value_name = "VERSION")]
        to: SchemaVersion,
        /// The pack to read
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Where to write the migrated pack
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|mut config| {
        if let Some(root) = cli.root {
            config.root = root;
        }
        match cli.command {
            Commands::Step { version, files } => run_step(&config, version, files),
            Commands::Chain {
                from,
                to,
                input,
                output,
            } => run_chain(&config, from, to, &input, &output),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<MigrateConfig> {
    match path {
        Some(path) => {
            let mut config = MigrateConfig::with_path(path);
            config.load_from_file()?;
            Ok(config)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let mut config = MigrateConfig::new();
            config.load_from_file()?;
            Ok(config)
        }
        None => {
            info!("No {DEFAULT_CONFIG_PATH}, using built-in defaults");
            Ok(MigrateConfig::new())
        }
    }
}

fn run_step(config: &MigrateConfig, version: SchemaVersion, files: Vec<String>) -> Result<()> {
    let invalid = || MigrateError::InvalidRange {
        from: version.previous().unwrap_or(version),
        to: version,
    };
    let step = step_for(version, config).ok_or_else(invalid)?;
    let mut job = MigrationJob::configured(version, config).ok_or_else(invalid)?;
    if !files.is_empty() {
        job = job.with_files(files);
    }

    let report = run_job(&job, &config.root, step.as_ref())?;
    info!(
        "{} -> {}: wrote {} files",
        version.previous().unwrap_or(version),
        version,
        report.written.len()
    );
    Ok(())
}

fn run_chain(
    config: &MigrateConfig,
    from: SchemaVersion,
    to: SchemaVersion,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let pipeline = Pipeline::between(from, to, config)?;
    let pack = read_pack(input)?;
    let migrated = pipeline
        .run(&pack)
        .map_err(|e| MigrateError::in_file(input, e))?;
    write_pack(output, &migrated)?;
    info!("{from} -> {to}: {} animations", migrated.len());
    Ok(())
}
