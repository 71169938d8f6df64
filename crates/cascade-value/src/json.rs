//! JSON interop
//!
//! Values parsed from JSON never contain opaque payloads. When rendering back
//! to JSON, opaque map entries are dropped and opaque list elements become
//! `null`, so diagnostics can print a layer without knowing what its callbacks
//! are.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::map::PropMap;
use crate::value::PropValue;

impl From<JsonValue> for PropValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(flag) => Self::Bool(flag),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => Self::Map(PropMap::from(map)),
        }
    }
}

impl From<JsonMap<String, JsonValue>> for PropMap {
    fn from(map: JsonMap<String, JsonValue>) -> Self {
        map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect()
    }
}

impl PropValue {
    /// Render as JSON; `None` for opaque payloads
    #[must_use]
    pub fn to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Self::Null => JsonValue::Null,
            Self::Bool(flag) => JsonValue::Bool(*flag),
            Self::Number(n) => JsonValue::Number(n.clone()),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(JsonValue::Null))
                    .collect(),
            ),
            Self::Map(map) => map.to_json(),
            Self::Opaque(_) => return None,
        })
    }
}

impl PropMap {
    /// Render as a JSON object, skipping opaque entries
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.iter()
                .filter_map(|(k, v)| v.to_json().map(|json| (k.clone(), json)))
                .collect(),
        )
    }
}

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Opaque(_) => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for PropMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible = self
            .iter()
            .filter(|(_, v)| !matches!(v, PropValue::Opaque(_)));
        let mut map = serializer.serialize_map(Some(visible.clone().count()))?;
        for (key, value) in visible {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Self::from)
    }
}

impl<'de> Deserialize<'de> for PropMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(map) => Ok(Self::from(map)),
            other => Err(de::Error::custom(format!(
                "expected a mapping, found {}",
                PropValue::from(other).kind()
            ))),
        }
    }
}
