//! v3 animation: buckets under `action_tracks`, action fields nested.
//!
//! ```json
//! {
//!   "is_looping": true,
//!   "action_tracks": {
//!     "draw_sprite": {
//!       "clips": [{"track_id": 0, "start": 0, "len": 10, "action": {"texture_id": "BunnyAtlas"}}],
//!       "tracks": [{"name": "body"}]
//!     }
//!   }
//! }
//! ```
//!
//! v4 has the same structure; its `draw_sprite` actions reference an
//! `atlas_file` instead of a `texture_id`.

use serde::{Deserialize, Serialize};

use super::ActionTracks;
use crate::action::ActionKind;
use crate::document::{Fields, child, index};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Clip {
    pub track_id: u32,
    pub start: u32,
    pub len: u32,
    /// `null` when the action carries no fields.
    pub action: Option<Fields>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Animation {
    pub is_looping: bool,
    pub action_tracks: ActionTracks<Clip>,
}

/// Location of a clip, e.g. `BunnyDash.action_tracks.draw_sprite.clips[2]`.
pub fn clip_location(anim: &str, kind: ActionKind, idx: usize) -> String {
    let bucket = child(&child(anim, "action_tracks"), kind.key());
    index(&child(&bucket, "clips"), idx)
}
