//! v2 → v3: nest action fields and group the buckets.
//!
//! 1. Action fields are no longer inlined into clips; they move to a field
//!    called `action` (`null` when there are none).
//! 2. The per-kind buckets move from the animation itself into a field called
//!    `action_tracks`.

use super::MigrationStep;
use crate::document::{Pack, encode, map_animations};
use crate::error::SchemaError;
use crate::schema::{v2, v3};
use crate::version::SchemaVersion;

#[derive(Debug, Clone, Copy, Default)]
pub struct NestActions;

impl MigrationStep for NestActions {
    fn name(&self) -> &'static str {
        "nest-actions"
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V3
    }

    fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError> {
        map_animations(pack, |name, anim| {
            let anim = v2::Animation::decode(anim, name)?;
            encode(&nest_animation(anim), name)
        })
    }
}

/// Move every clip's inlined action fields under `action`.
pub fn nest_animation(anim: v2::Animation) -> v3::Animation {
    let action_tracks = anim.buckets.map_clips(|clip| v3::Clip {
        track_id: clip.track_id,
        start: clip.start,
        len: clip.len,
        action: (!clip.fields.is_empty()).then_some(clip.fields),
    });

    v3::Animation {
        is_looping: anim.is_looping,
        action_tracks,
    }
}
