//! v2 animation: one bucket per action kind, action fields inlined.
//!
//! ```json
//! {
//!   "is_looping": true,
//!   "draw_sprite": {
//!     "clips": [{"track_id": 0, "start": 0, "len": 10, "rect_pos": [1, 2], "rect_size": [3, 4]}],
//!     "tracks": [{"name": "body"}]
//!   },
//!   "move": {"clips": [], "tracks": []}
//! }
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ActionTracks, Bucket};
use crate::action::ActionKind;
use crate::document::{Fields, as_object, child, decode, encode, field};
use crate::error::SchemaError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub track_id: u32,
    pub start: u32,
    pub len: u32,
    /// Action fields, stored next to the structural ones.
    #[serde(flatten)]
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub is_looping: bool,
    pub buckets: ActionTracks<Clip>,
}

impl Animation {
    pub fn decode(value: &Value, at: &str) -> Result<Animation, SchemaError> {
        let obj = as_object(value, at)?;
        let is_looping = decode(field(obj, "is_looping", at)?, &child(at, "is_looping"))?;

        let mut buckets = ActionTracks::new();
        for (key, bucket) in obj.iter().filter(|(k, _)| k.as_str() != "is_looping") {
            let kind = ActionKind::from_str(key).map_err(|_| SchemaError::UnknownActionKind {
                at: at.to_string(),
                kind: key.clone(),
            })?;
            let bucket: Bucket<Clip> = decode(bucket, &child(at, key))?;
            buckets.insert(kind, bucket);
        }

        Ok(Animation {
            is_looping,
            buckets,
        })
    }

    /// Encode with `is_looping` first and the buckets after it.
    pub fn encode(&self, at: &str) -> Result<Value, SchemaError> {
        let mut obj = Fields::new();
        obj.insert("is_looping".into(), Value::Bool(self.is_looping));
        for (kind, bucket) in self.buckets.iter() {
            obj.insert(kind.key().into(), encode(bucket, &child(at, kind.key()))?);
        }
        Ok(Value::Object(obj))
    }
}
