//! Error types for the migration steps and the tooling around them.
//!
//! [`SchemaError`] is raised by the steps themselves when a document does not
//! have the shape they expect. [`MigrateError`] wraps it together with the
//! file system, parsing and configuration failures of a run.

use std::path::PathBuf;

use thiserror::Error;

use crate::version::SchemaVersion;

/// The document does not match the shape a step expects.
///
/// Every variant carries the location of the offending value, written as a
/// dotted path (`BunnyIdleD.clips[3]`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{at}: {message}")]
    Malformed { at: String, message: String },

    #[error("{at}: missing field `{field}`")]
    MissingField { at: String, field: String },

    #[error("{at}: expected {expected}")]
    WrongType { at: String, expected: &'static str },

    #[error("{at}: clip has no action")]
    NoActionKind { at: String },

    #[error("{at}: clip has more than one action: {}", .kinds.join(", "))]
    AmbiguousActionKind { at: String, kinds: Vec<String> },

    #[error("{at}: unknown action kind `{kind}`")]
    UnknownActionKind { at: String, kind: String },

    #[error("{at}: track {track_id} does not exist")]
    UnknownTrack { at: String, track_id: u32 },

    #[error("{at}: track id {track_id} is used twice")]
    DuplicateTrack { at: String, track_id: u32 },

    #[error("{at}: action field `{field}` clashes with a clip field")]
    FieldCollision { at: String, field: String },

    #[error("{at}: no atlas file registered for texture `{texture_id}`")]
    UnresolvedAtlas { at: String, texture_id: String },

    #[error("renaming `{from}` to `{to}` collides with an existing animation")]
    KeyCollision { from: String, to: String },

    #[error("no animation id contains `{pattern}`")]
    NothingToRename { pattern: String },
}

/// Everything that can stop a migration run.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("{}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render document: {0}")]
    Render(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("step `{step}` produces {produces}, the job expects {expected}")]
    StepMismatch {
        step: &'static str,
        produces: SchemaVersion,
        expected: SchemaVersion,
    },

    #[error("cannot migrate from {from} to {to}")]
    InvalidRange {
        from: SchemaVersion,
        to: SchemaVersion,
    },
}

impl MigrateError {
    /// Attach the file a schema error was found in.
    pub fn in_file(path: impl Into<PathBuf>, source: SchemaError) -> Self {
        MigrateError::Schema {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
