//! Version-to-version migration steps.
//!
//! Each step turns a pack of schema version N into a pack of version N+1.
//! Steps borrow their input and build a new tree, and reject any input that
//! does not have exactly the shape the previous version produces, so running a
//! step on its own output fails (v4 only when the pack has sprite clips).
//!
//! | Step                  | Produces | Change                                        |
//! |-----------------------|----------|-----------------------------------------------|
//! | [`SplitTracks`]       | v2       | drop ids, one bucket per action kind          |
//! | [`NestActions`]       | v3       | action fields under `action`, `action_tracks` |
//! | [`ResolveAtlasFiles`] | v4       | `texture_id` becomes `atlas_file`             |
//! | [`RenameIds`]         | v5       | `Bunny` animation ids become `Bnuuy`          |

mod atlas_files;
mod nest_actions;
mod rename_ids;
mod split_tracks;

pub use atlas_files::{DEFAULT_ATLASES, ResolveAtlasFiles};
pub use nest_actions::NestActions;
pub use rename_ids::{DEFAULT_RENAME_FROM, DEFAULT_RENAME_TO, RenameIds};
pub use split_tracks::SplitTracks;

use crate::config::MigrateConfig;
use crate::document::Pack;
use crate::error::SchemaError;
use crate::version::SchemaVersion;

/// A single forward migration.
pub trait MigrationStep {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Version of the pack this step produces.
    fn target(&self) -> SchemaVersion;

    /// Migrate `pack`, leaving it untouched.
    fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError>;
}

/// The step producing `target`, configured from `config`.
///
/// Returns `None` for [`SchemaVersion::V1`], which no step produces.
pub fn step_for(target: SchemaVersion, config: &MigrateConfig) -> Option<Box<dyn MigrationStep>> {
    match target {
        SchemaVersion::V1 => None,
        SchemaVersion::V2 => Some(Box::new(SplitTracks)),
        SchemaVersion::V3 => Some(Box::new(NestActions)),
        SchemaVersion::V4 => Some(Box::new(ResolveAtlasFiles::new(config.atlases.clone()))),
        SchemaVersion::V5 => Some(Box::new(RenameIds::new(
            config.rename_from.clone(),
            config.rename_to.clone(),
        ))),
    }
}
