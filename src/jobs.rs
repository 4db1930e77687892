//! Per-step file lists and running a step over them.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::MigrateConfig;
use crate::document::Pack;
use crate::error::{MigrateError, Result};
use crate::steps::MigrationStep;
use crate::storage::{dest_path, read_pack, source_path, write_pack};
use crate::version::SchemaVersion;

const ANIMATION_PACKS: [&str; 3] = ["bnuuy.json", "shooter.json", "stabber.json"];
const ASSET_PACKS: [&str; 1] = ["bnuuy.json"];

/// Directory under the asset root a step works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Animations,
    Assets,
}

impl Category {
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Animations => "animations",
            Category::Assets => "assets",
        }
    }

    /// Where the packs of the step producing `target` live.
    pub fn for_target(target: SchemaVersion) -> Category {
        match target {
            SchemaVersion::V5 => Category::Assets,
            _ => Category::Animations,
        }
    }
}

/// One step applied to a list of packs.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationJob {
    pub target: SchemaVersion,
    pub category: Category,
    /// Base names; each is read from `_<name>` and written to `<name>`.
    pub files: Vec<String>,
}

impl MigrationJob {
    /// The job the game's assets were migrated with, or `None` for v1.
    pub fn default_for(target: SchemaVersion) -> Option<MigrationJob> {
        let files: &[&str] = match target {
            SchemaVersion::V1 => return None,
            SchemaVersion::V2 | SchemaVersion::V3 | SchemaVersion::V4 => &ANIMATION_PACKS,
            SchemaVersion::V5 => &ASSET_PACKS,
        };
        Some(MigrationJob {
            target,
            category: Category::for_target(target),
            files: files.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// The default job with the file list from `config`, if it has one.
    pub fn configured(target: SchemaVersion, config: &MigrateConfig) -> Option<MigrationJob> {
        let job = Self::default_for(target)?;
        match config.files_for(target) {
            Some(files) => Some(job.with_files(files.to_vec())),
            None => Some(job),
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }
}

/// Outcome of a successful [`run_job`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobReport {
    pub written: Vec<PathBuf>,
}

/// Apply `step` to every file of `job`.
///
/// All files are read and migrated before the first one is written, so a
/// failure leaves every destination untouched.
pub fn run_job(job: &MigrationJob, root: &Path, step: &dyn MigrationStep) -> Result<JobReport> {
    if step.target() != job.target {
        return Err(MigrateError::StepMismatch {
            step: step.name(),
            produces: step.target(),
            expected: job.target,
        });
    }

    let dir = job.category.dir_name();
    let mut migrated: Vec<(PathBuf, Pack)> = Vec::with_capacity(job.files.len());
    for name in &job.files {
        let src = source_path(root, dir, name);
        info!("{}: migrating {} to {}", step.name(), src.display(), job.target);
        let pack = read_pack(&src)?;
        let pack = step
            .apply(&pack)
            .map_err(|e| MigrateError::in_file(&src, e))?;
        migrated.push((dest_path(root, dir, name), pack));
    }

    let mut report = JobReport::default();
    for (dest, pack) in migrated {
        write_pack(&dest, &pack)?;
        report.written.push(dest);
    }
    Ok(report)
}
