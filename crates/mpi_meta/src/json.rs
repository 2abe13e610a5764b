//! JSON conversion for [`Meta`].
//!
//! Parsing is permissive: a JSON value of the wrong shape becomes Nil with a
//! `false` flag instead of an error. Only text that is not JSON at all fails.

use crate::error::MetaError;
use crate::meta::{Meta, MetaConfig, MetaMap, StrMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Parses JSON text into a Meta.
///
/// Returns the Meta and whether the value had a valid Meta shape.
///
/// # Errors
///
/// Returns [`MetaError::Json`] if `text` is not valid JSON.
///
/// ```
/// use mpi_meta::parse_meta;
///
/// let (m, ok) = parse_meta(r#"{"kind":"User","gid":"u1"}"#).unwrap();
/// assert!(ok);
/// assert_eq!(m.gid(), Some("u1"));
///
/// let (m, ok) = parse_meta("[1, 2]").unwrap();
/// assert!(!ok && m.is_nil());
///
/// assert!(parse_meta("{not json").is_err());
/// ```
pub fn parse_meta(text: &str) -> Result<(Meta, bool), MetaError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(to_meta_ok(&value))
}

/// Converts a JSON value into a Meta, collapsing invalid shapes to Nil.
#[must_use]
pub fn to_meta(value: &Value) -> Meta {
    to_meta_ok(value).0
}

/// Converts a JSON value into a Meta and reports whether the shape was valid.
///
/// The value must be an object with a string `kind`; `method`, `ns`, `gid`
/// and `payload` must be strings when present. Within a valid object,
/// non-string tags are skipped, numeric and boolean attributes are
/// stringified, invalid subs and rels are skipped and invalid list items
/// become Nil.
#[must_use]
pub fn to_meta_ok(value: &Value) -> (Meta, bool) {
    let Some(obj) = value.as_object() else {
        return (Meta::nil(), false);
    };
    let Some(kind) = obj.get("kind").and_then(Value::as_str) else {
        return (Meta::nil(), false);
    };

    let mut config = MetaConfig {
        kind: kind.to_string(),
        ..MetaConfig::default()
    };
    for (field, slot) in [
        ("method", &mut config.method),
        ("ns", &mut config.ns),
        ("gid", &mut config.gid),
        ("payload", &mut config.payload),
    ] {
        match obj.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => *slot = Some(s.clone()),
            Some(_) => return (Meta::nil(), false),
        }
    }

    if let Some(tags) = obj.get("tags") {
        config.tags = to_str_map(tags);
    }
    if let Some(attrs) = obj.get("attrs") {
        config.attrs = to_attr_map(attrs);
    }
    if let Some(subs) = obj.get("subs") {
        config.subs = to_meta_map(subs);
    }
    if let Some(rels) = obj.get("rels") {
        config.rels = to_meta_map(rels);
    }
    if let Some(list) = obj.get("list") {
        config.list = to_meta_list(list);
    }

    (Meta::from(config), true)
}

/// Keeps the valid Meta entries of a JSON object.
#[must_use]
pub fn to_meta_map(value: &Value) -> MetaMap {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| match to_meta_ok(v) {
                    (m, true) => Some((k.clone(), m)),
                    (_, false) => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a JSON array item by item; invalid items become Nil.
#[must_use]
pub fn to_meta_list(value: &Value) -> Vec<Meta> {
    value
        .as_array()
        .map(|items| items.iter().map(to_meta).collect())
        .unwrap_or_default()
}

fn to_str_map(value: &Value) -> StrMap {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn to_attr_map(value: &Value) -> StrMap {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| {
                    let s = match v {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((k.clone(), s))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn str_map_value(map: &StrMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn meta_map_value(map: &MetaMap, expand_payload: bool) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, m)| (k.clone(), m.object(expand_payload)))
            .collect(),
    )
}

impl Meta {
    /// Converts to a JSON value, omitting empty maps and lists.
    ///
    /// With `expand_payload`, a payload holding valid JSON text is emitted as
    /// the parsed value; any other payload is emitted as a string.
    #[must_use]
    pub fn object(&self, expand_payload: bool) -> Value {
        let mut obj = Map::new();
        obj.insert("kind".into(), Value::String(self.kind().to_string()));
        for (field, value) in [
            ("method", self.method()),
            ("ns", self.ns()),
            ("gid", self.gid()),
        ] {
            if let Some(value) = value {
                obj.insert(field.into(), Value::String(value.to_string()));
            }
        }
        if let Some(payload) = self.payload() {
            let value = if expand_payload {
                serde_json::from_str(payload).unwrap_or_else(|_| Value::String(payload.into()))
            } else {
                Value::String(payload.to_string())
            };
            obj.insert("payload".into(), value);
        }
        if !self.tags().is_empty() {
            obj.insert("tags".into(), str_map_value(self.tags()));
        }
        if !self.attrs().is_empty() {
            obj.insert("attrs".into(), str_map_value(self.attrs()));
        }
        if !self.subs().is_empty() {
            obj.insert("subs".into(), meta_map_value(self.subs(), expand_payload));
        }
        if !self.rels().is_empty() {
            obj.insert("rels".into(), meta_map_value(self.rels(), expand_payload));
        }
        if !self.list().is_empty() {
            let list = self
                .list()
                .iter()
                .map(|m| m.object(expand_payload))
                .collect();
            obj.insert("list".into(), Value::Array(list));
        }
        Value::Object(obj)
    }

    /// Compact JSON text.
    #[must_use]
    pub fn json(&self) -> String {
        self.object(false).to_string()
    }

    /// Indented JSON text.
    #[must_use]
    pub fn json_pretty(&self) -> String {
        let value = self.object(false);
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}

impl Serialize for Meta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.object(false).serialize(serializer)
    }
}

/// Deserializes permissively: an invalid shape yields Nil, not an error.
impl<'de> Deserialize<'de> for Meta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_meta(&value))
    }
}
