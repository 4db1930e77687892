//! Migration configuration.
//!
//! Holds the asset root, the atlas id to file table used by the v4 step, the
//! file lists of each step and the v5 rename pair. Every value has a default
//! matching the game's assets, so a missing configuration file still gives a
//! working setup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [paths]
//! root = .
//!
//! [atlases]
//! BunnyAtlas = bnuuy.png
//! WorldAtlas = world.png
//!
//! [files]
//! v2 = bnuuy.json, shooter.json, stabber.json
//! v5 = bnuuy.json
//!
//! [rename]
//! from = Bunny
//! to = Bnuuy
//! ```
//!
//! Keys are case sensitive. Entries under `[atlases]` add to (or override)
//! the default table.

use configparser::ini::Ini;
use log::info;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

use crate::error::MigrateError;
use crate::steps::{DEFAULT_ATLASES, DEFAULT_RENAME_FROM, DEFAULT_RENAME_TO};
use crate::version::SchemaVersion;

const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_CONFIG_PATH: &str = "./migrate.ini";

#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// Directory holding the `animations/` and `assets/` folders.
    pub root: PathBuf,
    /// Legacy atlas id to atlas file name.
    pub atlases: FxHashMap<String, String>,
    /// Per-step file lists overriding the defaults.
    pub files: FxHashMap<SchemaVersion, Vec<String>>,
    pub rename_from: String,
    pub rename_to: String,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrateConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            atlases: DEFAULT_ATLASES
                .iter()
                .map(|(id, file)| (id.to_string(), file.to_string()))
                .collect(),
            files: FxHashMap::default(),
            rename_from: DEFAULT_RENAME_FROM.to_string(),
            rename_to: DEFAULT_RENAME_TO.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration reading from a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file at `config_path`.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), MigrateError> {
        let mut ini = Ini::new_cs();
        ini.load(&self.config_path).map_err(|e| {
            MigrateError::Config(format!(
                "failed to load {}: {e}",
                self.config_path.display()
            ))
        })?;
        self.apply(&ini)?;

        info!(
            "Loaded config from {}: root={}, {} atlases, {} file lists",
            self.config_path.display(),
            self.root.display(),
            self.atlases.len(),
            self.files.len()
        );
        Ok(())
    }

    /// Load values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), MigrateError> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string())
            .map_err(|e| MigrateError::Config(format!("failed to parse config: {e}")))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), MigrateError> {
        // [paths] section
        if let Some(root) = ini.get("paths", "root") {
            self.root = PathBuf::from(root);
        }

        // [atlases] section
        if let Some(section) = ini.get_map_ref().get("atlases") {
            for (id, file) in section {
                match file.as_deref().map(str::trim) {
                    Some(file) if !file.is_empty() => {
                        self.atlases.insert(id.clone(), file.to_string());
                    }
                    _ => {
                        return Err(MigrateError::Config(format!(
                            "atlas `{id}` has no file name"
                        )));
                    }
                }
            }
        }

        // [files] section
        if let Some(section) = ini.get_map_ref().get("files") {
            for (key, list) in section {
                let version = SchemaVersion::parse(key)
                    .filter(|v| *v != SchemaVersion::V1)
                    .ok_or_else(|| {
                        MigrateError::Config(format!("no migration step produces `{key}`"))
                    })?;
                let files = list
                    .as_deref()
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect();
                self.files.insert(version, files);
            }
        }

        // [rename] section
        if let Some(from) = ini.get("rename", "from") {
            if from.is_empty() {
                return Err(MigrateError::Config("rename.from is empty".into()));
            }
            self.rename_from = from;
        }
        if let Some(to) = ini.get("rename", "to") {
            self.rename_to = to;
        }

        Ok(())
    }

    /// Files configured for the step producing `target`, if any.
    pub fn files_for(&self, target: SchemaVersion) -> Option<&[String]> {
        self.files.get(&target).map(Vec::as_slice)
    }
}
