use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu, ensure};

use super::filename::{Filename, FilenameError};
use crate::classify::{Encoding, EncodingError, buffer, mime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// Content of a file, either as a string or as owned immutable bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileData {
    Text(String),
    Bytes(Arc<[u8]>),
}

impl FileData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileData::Text(text) => Some(text),
            FileData::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FileData::Text(_) => None,
            FileData::Bytes(bytes) => Some(bytes),
        }
    }
}

impl Serialize for FileData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FileData::Text(text) => serializer.serialize_str(text),
            FileData::Bytes(bytes) => buffer::to_buffer_object(bytes).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FileData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::String(text) => Ok(FileData::Text(text)),
            other => buffer::to_bytes(&other)
                .map(|bytes| FileData::Bytes(bytes.into()))
                .ok_or_else(|| serde::de::Error::custom("expected a string or buffer-shaped data")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryValue {
    filename: Filename,
}

impl DirectoryValue {
    pub(crate) fn new(filename: Filename) -> Self {
        Self { filename }
    }

    pub fn filename(&self) -> &Filename {
        &self.filename
    }
}

/// Payload of a file node.
///
/// `ext` and `mime` are derived from the filename and kept in step with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileValue")]
pub struct FileValue {
    filename: Filename,
    data: FileData,
    #[serde(serialize_with = "serialize_encoding")]
    encoding: Option<Encoding>,
    ext: String,
    mime: String,
}

impl FileValue {
    pub(crate) fn new(
        filename: Filename,
        data: FileData,
        encoding: Option<Encoding>,
    ) -> Result<Self, ValueError> {
        let ext = mime::extension_of(&filename).to_string();
        let mime = mime::lookup(filename.as_str()).to_string();
        let value = Self {
            filename,
            data,
            encoding,
            ext,
            mime,
        };
        value.validate()?;
        Ok(value)
    }

    pub fn filename(&self) -> &Filename {
        &self.filename
    }

    pub fn data(&self) -> &FileData {
        &self.data
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Same content under a new name, with `ext` and `mime` derived again.
    pub fn with_filename(&self, filename: &str) -> Result<Self, ValueError> {
        let filename = Filename::parse(filename).context(FilenameSnafu)?;
        Self::new(filename, self.data.clone(), self.encoding)
    }

    /// The bytes this file holds on disk.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ValueError> {
        match (&self.data, self.encoding) {
            (FileData::Bytes(bytes), _) => Ok(bytes.to_vec()),
            (FileData::Text(text), Some(encoding)) => {
                encoding.encode(text).context(EncodingSnafu { encoding })
            }
            (FileData::Text(text), None) => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Checks that the data representation agrees with the encoding.
    pub fn validate(&self) -> Result<(), ValueError> {
        match (&self.data, self.encoding) {
            (FileData::Text(_), None) => Ok(()),
            (FileData::Text(_), Some(encoding)) if encoding.is_text() => Ok(()),
            (FileData::Text(text), Some(encoding)) if encoding.is_binary_string() => encoding
                .encode(text)
                .map(|_| ())
                .context(EncodingSnafu { encoding }),
            (FileData::Bytes(_), None | Some(Encoding::Buffer)) => Ok(()),
            (FileData::Text(_), Some(encoding)) => MismatchSnafu {
                encoding: encoding.to_string(),
                data: "string",
            }
            .fail(),
            (FileData::Bytes(_), Some(encoding)) => MismatchSnafu {
                encoding: encoding.to_string(),
                data: "bytes",
            }
            .fail(),
        }
    }
}

fn serialize_encoding<S: serde::Serializer>(
    encoding: &Option<Encoding>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match encoding {
        Some(encoding) => serializer.collect_str(encoding),
        None => serializer.serialize_none(),
    }
}

/// Wire shape of a file value; `ext` and `mime` are accepted but re-derived.
#[derive(Deserialize)]
struct RawFileValue {
    filename: Filename,
    data: FileData,
    #[serde(default)]
    encoding: Option<String>,
}

impl TryFrom<RawFileValue> for FileValue {
    type Error = ValueError;

    fn try_from(raw: RawFileValue) -> Result<Self, Self::Error> {
        let encoding = raw
            .encoding
            .map(|name| name.parse::<Encoding>())
            .transpose()
            .context(UnknownEncodingSnafu)?;
        FileValue::new(raw.filename, raw.data, encoding)
    }
}

/// The value a tree node carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeValue {
    Directory(DirectoryValue),
    File(FileValue),
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Directory(_) => NodeKind::Directory,
            NodeValue::File(_) => NodeKind::File,
        }
    }

    pub fn filename(&self) -> &Filename {
        match self {
            NodeValue::Directory(directory) => directory.filename(),
            NodeValue::File(file) => file.filename(),
        }
    }

    /// Path segment naming this node among its siblings.
    pub fn slug(&self) -> &str {
        self.filename().as_str()
    }

    pub fn as_file(&self) -> Option<&FileValue> {
        match self {
            NodeValue::File(file) => Some(file),
            NodeValue::Directory(_) => None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        match self {
            NodeValue::Directory(_) => Ok(()),
            NodeValue::File(file) => file.validate(),
        }
    }

    /// Validates `self` as a replacement for a node of kind `expected`.
    pub fn validate_as(&self, expected: NodeKind) -> Result<(), ValueError> {
        ensure!(
            self.kind() == expected,
            KindMismatchSnafu {
                expected,
                found: self.kind()
            }
        );
        self.validate()
    }
}

impl From<DirectoryValue> for NodeValue {
    fn from(value: DirectoryValue) -> Self {
        NodeValue::Directory(value)
    }
}

impl From<FileValue> for NodeValue {
    fn from(value: FileValue) -> Self {
        NodeValue::File(value)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ValueError {
    #[snafu(display("Expected filename to be a valid file name"))]
    FilenameError { source: FilenameError },
    #[snafu(display("Encoding '{}' cannot hold {} data", encoding, data))]
    MismatchError { encoding: String, data: String },
    #[snafu(display("Data does not match encoding '{}'", encoding))]
    EncodingError {
        encoding: Encoding,
        source: EncodingError,
    },
    #[snafu(display("Unrecognized encoding"))]
    UnknownEncodingError { source: EncodingError },
    #[snafu(display("Expected string data or a buffer-shaped value"))]
    NotBufferArgError,
    #[snafu(display("Bad value: expected a {} value, found a {} value", expected, found))]
    KindMismatchError { expected: NodeKind, found: NodeKind },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> Filename {
        Filename::parse(s).unwrap()
    }

    #[test]
    fn derives_ext_and_mime() {
        let file = FileValue::new(
            name("hello.txt"),
            FileData::Text("hi".into()),
            Some(Encoding::Utf8),
        )
        .unwrap();

        assert_eq!(file.ext(), ".txt");
        assert_eq!(file.mime(), "text/plain");
    }

    #[test]
    fn rejects_bytes_with_a_text_encoding() {
        let result = FileValue::new(
            name("bin.png"),
            FileData::Bytes(vec![1, 2].into()),
            Some(Encoding::Utf8),
        );
        assert!(matches!(result, Err(ValueError::MismatchError { .. })));
    }

    #[test]
    fn rejects_string_with_buffer_encoding() {
        let result = FileValue::new(
            name("bin.png"),
            FileData::Text("abc".into()),
            Some(Encoding::Buffer),
        );
        assert!(matches!(result, Err(ValueError::MismatchError { .. })));
    }

    #[test]
    fn rejects_undecodable_hex() {
        let result = FileValue::new(
            name("bin.png"),
            FileData::Text("not hex".into()),
            Some(Encoding::Hex),
        );
        assert!(matches!(result, Err(ValueError::EncodingError { .. })));
    }

    #[test]
    fn renaming_rederives_mime() {
        let file = FileValue::new(
            name("hello.txt"),
            FileData::Text("hello".into()),
            Some(Encoding::Utf8),
        )
        .unwrap();
        let renamed = file.with_filename("goodbye.json").unwrap();

        assert_eq!(renamed.filename().as_str(), "goodbye.json");
        assert_eq!(renamed.mime(), "application/json");
        assert_eq!(renamed.data(), file.data());
        assert!(file.with_filename("a/b.txt").is_err());
    }

    #[test]
    fn replacement_must_keep_kind() {
        let directory = NodeValue::from(DirectoryValue::new(name("hello")));
        assert!(directory.validate_as(NodeKind::Directory).is_ok());
        assert!(matches!(
            directory.validate_as(NodeKind::File),
            Err(ValueError::KindMismatchError { .. })
        ));
    }

    #[test]
    fn text_to_bytes_uses_encoding() {
        let file = FileValue::new(
            name("bin.png"),
            FileData::Text("00ff".into()),
            Some(Encoding::Hex),
        )
        .unwrap();
        assert_eq!(file.to_bytes().unwrap(), vec![0x00, 0xff]);
    }

    #[test]
    fn json_round_trip_keeps_bytes() {
        let file = FileValue::new(name("bin.png"), FileData::Bytes(vec![0, 128, 255].into()), None)
            .unwrap();
        let value = NodeValue::from(file);
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json["kind"], "file");
        assert_eq!(json["data"], json!({ "type": "Buffer", "data": [0, 128, 255] }));
        assert_eq!(json["encoding"], serde_json::Value::Null);

        let back: NodeValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn json_rejects_bad_filenames() {
        let json = json!({ "kind": "directory", "filename": "a/b" });
        assert!(serde_json::from_value::<NodeValue>(json).is_err());
    }
}
