//! v3 → v4: reference sprite atlases by file name.
//!
//! `draw_sprite` actions stop referencing their atlas by an internal id
//! (`texture_id`) and name the atlas file instead (`atlas_file`).

use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::MigrationStep;
use crate::action::ActionKind;
use crate::document::{Fields, Pack, child, decode, encode, field, map_animations};
use crate::error::SchemaError;
use crate::schema::v3;
use crate::version::SchemaVersion;

/// Atlas ids known to the game before atlases were referenced by file.
pub const DEFAULT_ATLASES: [(&str, &str); 2] =
    [("BunnyAtlas", "bnuuy.png"), ("WorldAtlas", "world.png")];

#[derive(Debug, Clone)]
pub struct ResolveAtlasFiles {
    atlases: FxHashMap<String, String>,
}

impl Default for ResolveAtlasFiles {
    fn default() -> Self {
        Self::new(
            DEFAULT_ATLASES
                .iter()
                .map(|(id, file)| (id.to_string(), file.to_string()))
                .collect(),
        )
    }
}

impl ResolveAtlasFiles {
    pub fn new(atlases: FxHashMap<String, String>) -> Self {
        Self { atlases }
    }

    /// Rewrite the `draw_sprite` clips of one animation.
    pub fn resolve_animation(
        &self,
        mut anim: v3::Animation,
        at: &str,
    ) -> Result<v3::Animation, SchemaError> {
        let bucket = anim
            .action_tracks
            .get_mut(ActionKind::DrawSprite)
            .ok_or_else(|| SchemaError::MissingField {
                at: child(at, "action_tracks"),
                field: ActionKind::DrawSprite.key().to_string(),
            })?;

        for (i, clip) in bucket.clips.iter_mut().enumerate() {
            let clip_at = v3::clip_location(at, ActionKind::DrawSprite, i);
            let action = clip.action.as_ref().ok_or_else(|| SchemaError::WrongType {
                at: child(&clip_at, "action"),
                expected: "an object",
            })?;
            clip.action = Some(self.resolve_action(action, &child(&clip_at, "action"))?);
        }

        Ok(anim)
    }

    fn resolve_action(&self, action: &Fields, at: &str) -> Result<Fields, SchemaError> {
        if action.contains_key("atlas_file") {
            return Err(SchemaError::FieldCollision {
                at: at.to_string(),
                field: "atlas_file".to_string(),
            });
        }
        let texture_id: String = decode(field(action, "texture_id", at)?, &child(at, "texture_id"))?;
        let atlas_file = self
            .atlases
            .get(&texture_id)
            .ok_or_else(|| SchemaError::UnresolvedAtlas {
                at: at.to_string(),
                texture_id: texture_id.clone(),
            })?;
        debug!("{at}: {texture_id} -> {atlas_file}");

        Ok(action
            .iter()
            .map(|(k, v)| match k.as_str() {
                "texture_id" => ("atlas_file".to_string(), Value::String(atlas_file.clone())),
                _ => (k.clone(), v.clone()),
            })
            .collect())
    }
}

impl MigrationStep for ResolveAtlasFiles {
    fn name(&self) -> &'static str {
        "resolve-atlas-files"
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V4
    }

    fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError> {
        map_animations(pack, |name, anim| {
            let anim: v3::Animation = decode(anim, name)?;
            encode(&self.resolve_animation(anim, name)?, name)
        })
    }
}
