//! v1 animation: flat tracks and clips with explicit ids.
//!
//! ```json
//! {
//!   "is_looping": true,
//!   "tracks": [{"id": 7, "name": "body"}],
//!   "clips": [
//!     {"id": 3, "track_id": 7, "start": 0, "len": 10,
//!      "draw_sprite": {"rect": {"x": 1, "y": 2, "w": 3, "h": 4}, "texture_id": "BunnyAtlas"}}
//!   ]
//! }
//! ```
//!
//! A clip's action kind is the one key that is not a structural field.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::action::ActionKind;
use crate::document::{Fields, as_array, as_object, child, decode, field, index};
use crate::error::SchemaError;

const ANIMATION_KEYS: [&str; 3] = ["is_looping", "tracks", "clips"];

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub is_looping: bool,
    pub tracks: Vec<Track>,
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Track {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: u32,
    pub track_id: u32,
    pub start: u32,
    pub len: u32,
    pub action: Action,
}

/// Sprite-sheet rectangle of a `draw_sprite` action.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Decoded action payload.
///
/// The kinds that later versions reshape get their own variant with the
/// affected field pulled out; every other kind keeps its fields as they are.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    DrawSprite { rect: Rect, fields: Fields },
    AttackBox { team: Value, fields: Fields },
    Other { kind: ActionKind, fields: Option<Fields> },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::DrawSprite { .. } => ActionKind::DrawSprite,
            Action::AttackBox { .. } => ActionKind::AttackBox,
            Action::Other { kind, .. } => *kind,
        }
    }

    fn decode(kind: ActionKind, payload: &Value, at: &str) -> Result<Action, SchemaError> {
        let fields = match payload {
            Value::Null => None,
            Value::Object(fields) => Some(fields),
            _ => {
                return Err(SchemaError::WrongType {
                    at: at.to_string(),
                    expected: "an object or null",
                });
            }
        };

        match kind {
            ActionKind::DrawSprite => {
                let fields = required(fields, at)?;
                let rect = decode(field(fields, "rect", at)?, &child(at, "rect"))?;
                Ok(Action::DrawSprite {
                    rect,
                    fields: without(fields, "rect"),
                })
            }
            ActionKind::AttackBox => {
                let fields = required(fields, at)?;
                Ok(Action::AttackBox {
                    team: field(fields, "team", at)?.clone(),
                    fields: without(fields, "team"),
                })
            }
            kind => Ok(Action::Other {
                kind,
                fields: fields.cloned(),
            }),
        }
    }
}

fn required<'a>(fields: Option<&'a Fields>, at: &str) -> Result<&'a Fields, SchemaError> {
    fields.ok_or_else(|| SchemaError::WrongType {
        at: at.to_string(),
        expected: "an object",
    })
}

fn without(fields: &Fields, key: &str) -> Fields {
    fields
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[derive(Deserialize)]
struct RawClip {
    id: u32,
    track_id: u32,
    start: u32,
    len: u32,
    #[serde(flatten)]
    rest: Fields,
}

impl Clip {
    pub fn decode(value: &Value, at: &str) -> Result<Clip, SchemaError> {
        let raw: RawClip = decode(value, at)?;

        let mut rest = raw.rest.iter();
        let (key, payload) = match (rest.next(), rest.next()) {
            (None, _) => return Err(SchemaError::NoActionKind { at: at.to_string() }),
            (Some(entry), None) => entry,
            (Some(_), Some(_)) => {
                return Err(SchemaError::AmbiguousActionKind {
                    at: at.to_string(),
                    kinds: raw.rest.keys().cloned().collect(),
                });
            }
        };
        let kind = ActionKind::from_str(key).map_err(|_| SchemaError::UnknownActionKind {
            at: at.to_string(),
            kind: key.clone(),
        })?;

        Ok(Clip {
            id: raw.id,
            track_id: raw.track_id,
            start: raw.start,
            len: raw.len,
            action: Action::decode(kind, payload, &child(at, key))?,
        })
    }
}

impl Animation {
    pub fn decode(value: &Value, at: &str) -> Result<Animation, SchemaError> {
        let obj = as_object(value, at)?;
        if let Some(extra) = obj.keys().find(|k| !ANIMATION_KEYS.contains(&k.as_str())) {
            return Err(SchemaError::Malformed {
                at: at.to_string(),
                message: format!("unexpected field `{extra}`"),
            });
        }

        let is_looping = decode(field(obj, "is_looping", at)?, &child(at, "is_looping"))?;

        let tracks_at = child(at, "tracks");
        let tracks = as_array(field(obj, "tracks", at)?, &tracks_at)?
            .iter()
            .enumerate()
            .map(|(i, t)| decode::<Track>(t, &index(&tracks_at, i)))
            .collect::<Result<Vec<_>, _>>()?;

        let clips_at = child(at, "clips");
        let clips = as_array(field(obj, "clips", at)?, &clips_at)?
            .iter()
            .enumerate()
            .map(|(i, c)| Clip::decode(c, &index(&clips_at, i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Animation {
            is_looping,
            tracks,
            clips,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clip(extra: Value) -> Value {
        let mut clip = json!({"id": 0, "track_id": 1, "start": 2, "len": 3});
        for (k, v) in extra.as_object().unwrap() {
            clip[k] = v.clone();
        }
        clip
    }

    #[test]
    fn test_decode_draw_sprite_pulls_out_rect() {
        let value = clip(json!({
            "draw_sprite": {"layer": 1, "rect": {"x": 1, "y": 2, "w": 3, "h": 4}, "texture_id": "T1"}
        }));
        let clip = Clip::decode(&value, "A.clips[0]").unwrap();
        let Action::DrawSprite { rect, fields } = &clip.action else {
            panic!("expected draw_sprite, got {:?}", clip.action);
        };
        assert_eq!(*rect, Rect { x: 1, y: 2, w: 3, h: 4 });
        assert_eq!(
            Value::Object(fields.clone()),
            json!({"layer": 1, "texture_id": "T1"})
        );
    }

    #[test]
    fn test_decode_attack_box_pulls_out_team() {
        let value = clip(json!({"attack_box": {"team": "Player", "graze_value": 0.5}}));
        let clip = Clip::decode(&value, "A.clips[0]").unwrap();
        assert_eq!(clip.action.kind(), ActionKind::AttackBox);
        let Action::AttackBox { team, fields } = &clip.action else {
            unreachable!();
        };
        assert_eq!(*team, json!("Player"));
        assert!(!fields.contains_key("team"));
    }

    #[test]
    fn test_decode_null_payload() {
        let value = clip(json!({"invulnerability": null}));
        let clip = Clip::decode(&value, "A.clips[0]").unwrap();
        assert_eq!(
            clip.action,
            Action::Other {
                kind: ActionKind::Invulnerability,
                fields: None
            }
        );
    }

    #[test]
    fn test_clip_without_action_is_rejected() {
        let err = Clip::decode(&clip(json!({})), "A.clips[0]").unwrap_err();
        assert_eq!(err, SchemaError::NoActionKind { at: "A.clips[0]".into() });
    }

    #[test]
    fn test_clip_with_two_actions_is_rejected() {
        let value = clip(json!({"move": null, "spawn": null}));
        let err = Clip::decode(&value, "A.clips[0]").unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousActionKind { kinds, .. } if kinds.len() == 2));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Clip::decode(&clip(json!({"teleport": null})), "A.clips[0]").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownActionKind { kind, .. } if kind == "teleport"));
    }

    #[test]
    fn test_draw_sprite_without_rect_is_rejected() {
        let value = clip(json!({"draw_sprite": {"texture_id": "T1"}}));
        let err = Clip::decode(&value, "A.clips[0]").unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                at: "A.clips[0].draw_sprite".into(),
                field: "rect".into()
            }
        );
    }

    #[test]
    fn test_missing_structural_field_is_rejected() {
        let value = json!({"id": 0, "track_id": 1, "len": 3, "move": null});
        let err = Clip::decode(&value, "A.clips[0]").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_decode_animation() {
        let value = json!({
            "is_looping": false,
            "tracks": [{"id": 4, "name": "legs"}],
            "clips": [clip(json!({"move": null}))]
        });
        let anim = Animation::decode(&value, "A").unwrap();
        assert!(!anim.is_looping);
        assert_eq!(anim.tracks, [Track { id: 4, name: "legs".into() }]);
        assert_eq!(anim.clips.len(), 1);
    }

    #[test]
    fn test_animation_without_tracks_is_rejected() {
        let value = json!({"is_looping": false, "clips": []});
        let err = Animation::decode(&value, "A").unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                at: "A".into(),
                field: "tracks".into()
            }
        );
    }

    #[test]
    fn test_animation_with_unexpected_field_is_rejected() {
        let value = json!({"is_looping": false, "tracks": [], "clips": [], "move": {}});
        assert!(matches!(
            Animation::decode(&value, "A"),
            Err(SchemaError::Malformed { .. })
        ));
    }
}
