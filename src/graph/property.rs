//! Property values for graph nodes and edges
//!
//! Every property value is an opaque byte string. Typed constructors apply the
//! same normalisation the query parser applies to literals:
//! - strings become their UTF-8 bytes
//! - integers become base-10 ASCII digits
//! - booleans become `true` / `false`
//!
//! so a value built in code compares equal to the same literal written in a query.

use bytes::Bytes;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A single property value, compared by exact byte equality.
///
/// Cloning is cheap: the underlying buffer is reference counted, so copying a
/// node into a subgraph does not duplicate its property payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyValue(Bytes);

impl PropertyValue {
    /// Wrap raw bytes without any normalisation
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        PropertyValue(bytes.into())
    }

    /// Raw byte content
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Content as UTF-8 text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Interpret the content as a base-10 integer
    pub fn as_integer(&self) -> Option<i64> {
        self.as_str()?.parse().ok()
    }

    /// Interpret the content as a boolean literal
    pub fn as_boolean(&self) -> Option<bool> {
        match self.as_str()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue(Bytes::from(s))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue(Bytes::from(i.to_string()))
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::from(i as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue(Bytes::from_static(if b { b"true" } else { b"false" }))
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(raw: Vec<u8>) -> Self {
        PropertyValue(Bytes::from(raw))
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(raw: &[u8]) -> Self {
        PropertyValue(Bytes::copy_from_slice(raw))
    }
}

impl From<Bytes> for PropertyValue {
    fn from(raw: Bytes) -> Self {
        PropertyValue(raw)
    }
}

// Human-readable formats get a string when the bytes are UTF-8 and a byte array
// otherwise; binary formats always get the raw bytes.
impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            match self.as_str() {
                Some(text) => serializer.serialize_str(text),
                None => self.0.as_ref().serialize(serializer),
            }
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a byte array")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PropertyValue::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(PropertyValue::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(PropertyValue::from(v))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(PropertyValue::from(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut raw = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            raw.push(byte);
        }
        Ok(PropertyValue::from(raw))
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(PropertyValueVisitor)
        } else {
            deserializer.deserialize_byte_buf(PropertyValueVisitor)
        }
    }
}

/// Property map for storing node and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Returns true when `props` carries every key of `filter` with a byte-equal value.
/// An empty filter matches everything.
pub fn matches_all(props: &PropertyMap, filter: &PropertyMap) -> bool {
    filter
        .iter()
        .all(|(key, want)| props.get(key).is_some_and(|have| have == want))
}
