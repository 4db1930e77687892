//! v4 → v5: rename the `Bunny` animation ids to `Bnuuy`.

use log::debug;

use super::MigrationStep;
use crate::document::Pack;
use crate::error::SchemaError;
use crate::version::SchemaVersion;

pub const DEFAULT_RENAME_FROM: &str = "Bunny";
pub const DEFAULT_RENAME_TO: &str = "Bnuuy";

/// Replaces `from` with `to` in every animation id of a pack.
///
/// Animations keep their position and value. A pack without any id containing
/// `from` is rejected, as is a rename that lands on an id already in use.
#[derive(Debug, Clone)]
pub struct RenameIds {
    from: String,
    to: String,
}

impl Default for RenameIds {
    fn default() -> Self {
        Self::new(DEFAULT_RENAME_FROM, DEFAULT_RENAME_TO)
    }
}

impl RenameIds {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl MigrationStep for RenameIds {
    fn name(&self) -> &'static str {
        "rename-ids"
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V5
    }

    fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError> {
        if !pack.keys().any(|k| k.contains(&self.from)) {
            return Err(SchemaError::NothingToRename {
                pattern: self.from.clone(),
            });
        }

        let mut out = Pack::new();
        for (key, anim) in pack {
            let renamed = key.replace(&self.from, &self.to);
            let taken = out.contains_key(&renamed)
                || (renamed != *key && pack.contains_key(&renamed));
            if taken {
                return Err(SchemaError::KeyCollision {
                    from: key.clone(),
                    to: renamed,
                });
            }
            if renamed != *key {
                debug!("{key} -> {renamed}");
            }
            out.insert(renamed, anim.clone());
        }
        Ok(out)
    }
}
