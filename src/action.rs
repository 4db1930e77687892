//! Clip action kinds.

use serde::{Deserialize, Serialize};

/// The category of behavior a clip performs.
///
/// Variant order is the order buckets are written in when a v1 animation is
/// split per kind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    AttackBox,
    DrawSprite,
    Move,
    LockInput,
    Spawn,
    Invulnerability,
}

impl ActionKind {
    /// Key under which this kind is stored in a document.
    pub fn key(self) -> &'static str {
        self.into()
    }
}
