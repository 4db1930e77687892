//! Typed shapes of an animation at each schema version.
//!
//! Steps decode their input animation into one of these shapes once, at the
//! boundary, and encode their output from the next shape. The kind of a clip's
//! action is therefore resolved a single time instead of being re-derived from
//! whichever key happens to be present.
//!
//! - [`v1`] – flat `tracks`/`clips` with explicit ids and kind-keyed payloads
//! - [`v2`] – one bucket per action kind, action fields inlined into clips
//! - [`v3`] – buckets under `action_tracks`, action fields nested under
//!   `action` (also the v4 shape; only the `draw_sprite` fields differ)

pub mod v1;
pub mod v2;
pub mod v3;

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::VariantArray;

use crate::action::ActionKind;

/// Structural clip fields shared by every version from v2 on.
pub const CLIP_KEYS: [&str; 3] = ["track_id", "start", "len"];

/// A named lane, identified by its position in [`Bucket::tracks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Track {
    pub name: String,
}

/// Clips and tracks of a single action kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bucket<C> {
    pub clips: Vec<C>,
    pub tracks: Vec<Track>,
}

impl<C> Default for Bucket<C> {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

/// Buckets keyed by action kind, kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTracks<C> {
    entries: Vec<(ActionKind, Bucket<C>)>,
}

impl<C> Default for ActionTracks<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> ActionTracks<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty bucket for every kind, in declaration order.
    pub fn every_kind() -> Self {
        Self {
            entries: ActionKind::VARIANTS
                .iter()
                .map(|kind| (*kind, Bucket::default()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, kind: ActionKind) -> Option<&Bucket<C>> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, b)| b)
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> Option<&mut Bucket<C>> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, b)| b)
    }

    /// The bucket for `kind`, appended empty if missing.
    pub fn bucket_mut(&mut self, kind: ActionKind) -> &mut Bucket<C> {
        let pos = match self.entries.iter().position(|(k, _)| *k == kind) {
            Some(pos) => pos,
            None => {
                self.entries.push((kind, Bucket::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    /// Insert a bucket, returning the one it replaced.
    pub fn insert(&mut self, kind: ActionKind, bucket: Bucket<C>) -> Option<Bucket<C>> {
        match self.get_mut(kind) {
            Some(slot) => Some(std::mem::replace(slot, bucket)),
            None => {
                self.entries.push((kind, bucket));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &Bucket<C>)> {
        self.entries.iter().map(|(k, b)| (*k, b))
    }

    /// Rebuild every bucket's clips, keeping tracks and order.
    pub fn map_clips<D, F>(self, mut f: F) -> ActionTracks<D>
    where
        F: FnMut(C) -> D,
    {
        ActionTracks {
            entries: self
                .entries
                .into_iter()
                .map(|(kind, bucket)| {
                    let clips = bucket.clips.into_iter().map(&mut f).collect();
                    (
                        kind,
                        Bucket {
                            clips,
                            tracks: bucket.tracks,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl<C: Serialize> Serialize for ActionTracks<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, bucket) in &self.entries {
            map.serialize_entry(kind.key(), bucket)?;
        }
        map.end()
    }
}

struct ActionTracksVisitor<C>(PhantomData<C>);

impl<'de, C: Deserialize<'de>> Visitor<'de> for ActionTracksVisitor<C> {
    type Value = ActionTracks<C>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from action kind to {clips, tracks}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut tracks = ActionTracks::new();
        while let Some((kind, bucket)) = access.next_entry::<ActionKind, Bucket<C>>()? {
            if tracks.insert(kind, bucket).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate action kind `{kind}`"
                )));
            }
        }
        Ok(tracks)
    }
}

impl<'de, C: Deserialize<'de>> Deserialize<'de> for ActionTracks<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ActionTracksVisitor(PhantomData))
    }
}
