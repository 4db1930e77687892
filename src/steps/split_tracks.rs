//! v1 → v2: detach ids and split clips into one bucket per action kind.
//!
//! 1. Tracks and clips lose their `id`; their position in the array is their
//!    identity from now on.
//! 2. Every action kind gets its own `{clips, tracks}` bucket, stored on the
//!    animation under the kind's name. A clip's `track_id` becomes the index
//!    of its track inside that bucket, tracks being added in first-use order.
//! 3. `draw_sprite` stores its rectangle as `rect_pos` and `rect_size`.
//! 4. `attack_box` drops `team`, which is taken from the owning object.
//! 5. Action fields are inlined into the clip.

use log::debug;
use rustc_hash::FxHashMap;
use serde_json::json;

use super::MigrationStep;
use crate::action::ActionKind;
use crate::document::{Fields, Pack, child, index, map_animations};
use crate::error::SchemaError;
use crate::schema::{ActionTracks, CLIP_KEYS, Track, v1, v2};
use crate::version::SchemaVersion;

#[derive(Debug, Clone, Copy, Default)]
pub struct SplitTracks;

impl MigrationStep for SplitTracks {
    fn name(&self) -> &'static str {
        "split-tracks"
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V2
    }

    fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError> {
        map_animations(pack, |name, anim| {
            let anim = v1::Animation::decode(anim, name)?;
            split_animation(&anim, name)?.encode(name)
        })
    }
}

/// Split a v1 animation into per-kind buckets.
pub fn split_animation(anim: &v1::Animation, at: &str) -> Result<v2::Animation, SchemaError> {
    let tracks_at = child(at, "tracks");
    let mut names: FxHashMap<u32, &str> = FxHashMap::default();
    for (i, track) in anim.tracks.iter().enumerate() {
        if names.insert(track.id, &track.name).is_some() {
            return Err(SchemaError::DuplicateTrack {
                at: index(&tracks_at, i),
                track_id: track.id,
            });
        }
    }

    let clips_at = child(at, "clips");
    let mut buckets = ActionTracks::every_kind();
    let mut remap: FxHashMap<(ActionKind, u32), u32> = FxHashMap::default();

    for (i, clip) in anim.clips.iter().enumerate() {
        let clip_at = index(&clips_at, i);
        let kind = clip.action.kind();
        let name = *names
            .get(&clip.track_id)
            .ok_or_else(|| SchemaError::UnknownTrack {
                at: clip_at.clone(),
                track_id: clip.track_id,
            })?;

        let bucket = buckets.bucket_mut(kind);
        let track_id = *remap.entry((kind, clip.track_id)).or_insert_with(|| {
            bucket.tracks.push(Track {
                name: name.to_string(),
            });
            (bucket.tracks.len() - 1) as u32
        });

        bucket.clips.push(v2::Clip {
            track_id,
            start: clip.start,
            len: clip.len,
            fields: inline_fields(&clip.action, &clip_at)?,
        });
    }

    debug!(
        "{at}: split {} clips over {} tracks",
        anim.clips.len(),
        remap.len()
    );

    Ok(v2::Animation {
        is_looping: anim.is_looping,
        buckets,
    })
}

/// Keys a `draw_sprite` rectangle is stored under from v2 on.
const RECT_KEYS: [&str; 2] = ["rect_pos", "rect_size"];

/// Fields of `action` as they appear inlined in a v2 clip.
fn inline_fields(action: &v1::Action, at: &str) -> Result<Fields, SchemaError> {
    let fields = match action {
        v1::Action::DrawSprite { rect, fields } => {
            if let Some(clash) = RECT_KEYS.iter().find(|k| fields.contains_key(**k)) {
                return Err(SchemaError::FieldCollision {
                    at: child(at, ActionKind::DrawSprite.key()),
                    field: clash.to_string(),
                });
            }
            let mut out = Fields::new();
            out.insert("rect_pos".into(), json!([rect.x, rect.y]));
            out.insert("rect_size".into(), json!([rect.w, rect.h]));
            out.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            out
        }
        v1::Action::AttackBox { fields, .. } => fields.clone(),
        v1::Action::Other { fields, .. } => fields.clone().unwrap_or_default(),
    };

    if let Some(clash) = fields.keys().find(|k| CLIP_KEYS.contains(&k.as_str())) {
        return Err(SchemaError::FieldCollision {
            at: child(at, action.kind().key()),
            field: clash.clone(),
        });
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn pack(value: Value) -> Pack {
        value.as_object().unwrap().clone()
    }

    fn migrate(value: Value) -> Result<Value, SchemaError> {
        SplitTracks.apply(&pack(value)).map(Value::Object)
    }

    #[test]
    fn test_draw_sprite_example() {
        let out = migrate(json!({
            "BunnyIdleD": {
                "is_looping": true,
                "tracks": [{"id": 7, "name": "body"}],
                "clips": [{
                    "id": 3, "track_id": 7, "start": 0, "len": 10,
                    "draw_sprite": {"rect": {"x": 1, "y": 2, "w": 3, "h": 4}, "texture_id": "T1"}
                }]
            }
        }))
        .unwrap();

        let draw = &out["BunnyIdleD"]["draw_sprite"];
        assert_eq!(draw["tracks"], json!([{"name": "body"}]));
        assert_eq!(
            draw["clips"],
            json!([{
                "track_id": 0, "start": 0, "len": 10,
                "rect_pos": [1, 2], "rect_size": [3, 4], "texture_id": "T1"
            }])
        );
        assert!(out["BunnyIdleD"].get("tracks").is_none());
        assert!(out["BunnyIdleD"].get("clips").is_none());
    }

    #[test]
    fn test_every_kind_gets_a_bucket_after_is_looping() {
        let out = migrate(json!({
            "A": {"is_looping": false, "tracks": [], "clips": []}
        }))
        .unwrap();
        let keys: Vec<&String> = out["A"].as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "is_looping",
                "attack_box",
                "draw_sprite",
                "move",
                "lock_input",
                "spawn",
                "invulnerability"
            ]
        );
        assert_eq!(out["A"]["spawn"], json!({"clips": [], "tracks": []}));
    }

    #[test]
    fn test_track_ids_are_first_seen_per_kind() {
        let out = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [
                    {"id": 10, "name": "legs"},
                    {"id": 20, "name": "body"},
                    {"id": 30, "name": "hurt"}
                ],
                "clips": [
                    {"id": 0, "track_id": 20, "start": 0, "len": 1, "move": null},
                    {"id": 1, "track_id": 10, "start": 0, "len": 1, "move": null},
                    {"id": 2, "track_id": 20, "start": 1, "len": 1, "move": null},
                    {"id": 3, "track_id": 10, "start": 0, "len": 1, "invulnerability": null},
                    {"id": 4, "track_id": 30, "start": 0, "len": 1, "invulnerability": null}
                ]
            }
        }))
        .unwrap();

        let moves = &out["A"]["move"];
        assert_eq!(moves["tracks"], json!([{"name": "body"}, {"name": "legs"}]));
        let ids: Vec<&Value> = moves["clips"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| &c["track_id"])
            .collect();
        assert_eq!(ids, [&json!(0), &json!(1), &json!(0)]);

        // The same source track gets its own index in every kind's bucket.
        let inv = &out["A"]["invulnerability"];
        assert_eq!(inv["tracks"], json!([{"name": "legs"}, {"name": "hurt"}]));
        assert_eq!(inv["clips"][0]["track_id"], json!(0));
        assert_eq!(inv["clips"][1]["track_id"], json!(1));
    }

    #[test]
    fn test_attack_box_team_is_removed() {
        let out = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "hit"}],
                "clips": [{
                    "id": 0, "track_id": 1, "start": 2, "len": 3,
                    "attack_box": {"team": "Enemy", "local_rotation": 0.0}
                }]
            }
        }))
        .unwrap();
        assert_eq!(
            out["A"]["attack_box"]["clips"][0],
            json!({"track_id": 0, "start": 2, "len": 3, "local_rotation": 0.0})
        );
    }

    #[test]
    fn test_unknown_track_is_rejected() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [],
                "clips": [{"id": 0, "track_id": 5, "start": 0, "len": 1, "move": null}]
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownTrack {
                at: "A.clips[0]".into(),
                track_id: 5
            }
        );
    }

    #[test]
    fn test_duplicate_track_is_rejected() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "a"}, {"id": 1, "name": "b"}],
                "clips": []
            }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTrack { track_id: 1, .. }));
    }

    #[test]
    fn test_payload_field_named_like_clip_field_is_rejected() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "a"}],
                "clips": [{"id": 0, "track_id": 1, "start": 0, "len": 1, "spawn": {"start": 4}}]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::FieldCollision { field, .. } if field == "start"));
    }

    #[test]
    fn test_payload_rect_pos_does_not_override_rect() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "a"}],
                "clips": [{
                    "id": 0, "track_id": 1, "start": 0, "len": 1,
                    "draw_sprite": {
                        "rect": {"x": 1, "y": 2, "w": 3, "h": 4},
                        "rect_pos": [9, 9],
                        "texture_id": "T"
                    }
                }]
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::FieldCollision {
                at: "A.clips[0].draw_sprite".into(),
                field: "rect_pos".into()
            }
        );
    }

    #[test]
    fn test_payload_rect_size_is_rejected() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "a"}],
                "clips": [{
                    "id": 0, "track_id": 1, "start": 0, "len": 1,
                    "draw_sprite": {"rect": {"x": 0, "y": 0, "w": 1, "h": 1}, "rect_size": [2, 2]}
                }]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::FieldCollision { field, .. } if field == "rect_size"));
    }

    #[test]
    fn test_clip_with_two_kinds_is_rejected() {
        let err = migrate(json!({
            "A": {
                "is_looping": false,
                "tracks": [{"id": 1, "name": "a"}],
                "clips": [{"id": 0, "track_id": 1, "start": 0, "len": 1, "move": null, "spawn": null}]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousActionKind { .. }));
    }

    #[test]
    fn test_rerun_on_output_fails() {
        let once = SplitTracks
            .apply(&pack(json!({
                "A": {"is_looping": false, "tracks": [], "clips": []}
            })))
            .unwrap();
        assert!(SplitTracks.apply(&once).is_err());
    }
}
