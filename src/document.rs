//! Untyped document tree helpers.
//!
//! A pack is kept as a [`serde_json::Map`] with insertion order preserved, so
//! a migrated file lists its animations and fields in the same order as the
//! source file.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Top-level asset document: animation name to animation.
pub type Pack = Map<String, Value>;

/// A bag of named fields (an action payload, a clip, an animation).
pub type Fields = Map<String, Value>;

/// Borrow `value` as an object.
pub fn as_object<'a>(value: &'a Value, at: &str) -> Result<&'a Fields, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::WrongType {
        at: at.to_string(),
        expected: "an object",
    })
}

/// Borrow `value` as an array.
pub fn as_array<'a>(value: &'a Value, at: &str) -> Result<&'a Vec<Value>, SchemaError> {
    value.as_array().ok_or_else(|| SchemaError::WrongType {
        at: at.to_string(),
        expected: "an array",
    })
}

/// Borrow a required field of `obj`.
pub fn field<'a>(obj: &'a Fields, name: &str, at: &str) -> Result<&'a Value, SchemaError> {
    obj.get(name).ok_or_else(|| SchemaError::MissingField {
        at: at.to_string(),
        field: name.to_string(),
    })
}

/// Decode a value into a typed shape, reporting serde's message on failure.
pub fn decode<T: DeserializeOwned>(value: &Value, at: &str) -> Result<T, SchemaError> {
    T::deserialize(value).map_err(|e| SchemaError::Malformed {
        at: at.to_string(),
        message: e.to_string(),
    })
}

/// Encode a typed shape back into a tree.
pub fn encode<T: serde::Serialize>(shape: &T, at: &str) -> Result<Value, SchemaError> {
    serde_json::to_value(shape).map_err(|e| SchemaError::Malformed {
        at: at.to_string(),
        message: e.to_string(),
    })
}

/// Location of a child key, e.g. `BunnyDash.action_tracks`.
pub fn child(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}

/// Location of an array element, e.g. `BunnyDash.clips[2]`.
pub fn index(at: &str, idx: usize) -> String {
    format!("{at}[{idx}]")
}

/// Apply `f` to every animation of `pack`, keeping key order.
///
/// `f` receives the animation name, which is also the location prefix for
/// its errors.
pub fn map_animations<F>(pack: &Pack, mut f: F) -> Result<Pack, SchemaError>
where
    F: FnMut(&str, &Value) -> Result<Value, SchemaError>,
{
    let mut out = Pack::new();
    for (name, anim) in pack {
        out.insert(name.clone(), f(name, anim)?);
    }
    Ok(out)
}
