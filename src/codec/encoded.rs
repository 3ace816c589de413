use hashlink::LinkedHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value stored under a path in the flat encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedValue {
    /// An empty directory, written as `true`.
    Directory,
    /// Text content, or base64 for binary content.
    Content(String),
}

impl EncodedValue {
    pub fn as_content(&self) -> Option<&str> {
        match self {
            EncodedValue::Directory => None,
            EncodedValue::Content(content) => Some(content),
        }
    }
}

impl From<&str> for EncodedValue {
    fn from(content: &str) -> Self {
        EncodedValue::Content(content.to_string())
    }
}

impl From<String> for EncodedValue {
    fn from(content: String) -> Self {
        EncodedValue::Content(content)
    }
}

impl Serialize for EncodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EncodedValue::Directory => serializer.serialize_bool(true),
            EncodedValue::Content(content) => serializer.serialize_str(content),
        }
    }
}

impl<'de> Deserialize<'de> for EncodedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Marker(bool),
            Content(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Marker(true) => Ok(EncodedValue::Directory),
            Raw::Marker(false) => Err(serde::de::Error::custom(
                "directory marker must be `true`",
            )),
            Raw::Content(content) => Ok(EncodedValue::Content(content)),
        }
    }
}

/// Path-keyed flat encoding of a tree.
///
/// Insertion order is significant when decoding: ancestors are materialized
/// in the order their paths are first seen.
pub type Encoded = LinkedHashMap<String, EncodedValue>;

/// Builds an [`Encoded`] map from `(path, value)` pairs, keeping their order.
pub fn encoded<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Encoded
where
    K: Into<String>,
    V: Into<EncodedValue>,
{
    entries
        .into_iter()
        .map(|(path, value)| (path.into(), value.into()))
        .collect()
}
