use derive_more::From;
use serde_json::Value;
use snafu::{ResultExt, ensure};

use super::filename::Filename;
use super::value::{
    DirectoryValue, FileData, FileValue, FilenameSnafu, NotBufferArgSnafu, ValueError,
};
use crate::classify::{Encoding, buffer};

/// Data handed to [`create_file`].
///
/// `Json` accepts whatever a JSON round trip produced: a string, a byte
/// array, or a `{ "type": "Buffer", "data": [..] }` object.
#[derive(Debug, Clone, PartialEq, From)]
pub enum FileInput {
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl From<&str> for FileInput {
    fn from(text: &str) -> Self {
        FileInput::Text(text.to_string())
    }
}

impl From<&[u8]> for FileInput {
    fn from(bytes: &[u8]) -> Self {
        FileInput::Bytes(bytes.to_vec())
    }
}

pub fn create_directory(filename: &str) -> Result<DirectoryValue, ValueError> {
    let filename = Filename::parse(filename).context(FilenameSnafu)?;
    Ok(DirectoryValue::new(filename))
}

/// Builds a validated file value.
///
/// Without an encoding, string data defaults to `utf8` and buffer-like data
/// is copied into owned bytes. With one, the data is taken as given and must
/// agree with it.
pub fn create_file(
    filename: &str,
    data: impl Into<FileInput>,
    encoding: Option<Encoding>,
) -> Result<FileValue, ValueError> {
    let filename = Filename::parse(filename).context(FilenameSnafu)?;

    let data = match data.into() {
        FileInput::Text(text) | FileInput::Json(Value::String(text)) => FileData::Text(text),
        FileInput::Bytes(bytes) => FileData::Bytes(bytes.into()),
        FileInput::Json(other) => {
            ensure!(encoding.is_none(), NotBufferArgSnafu);
            let bytes = buffer::to_bytes(&other).ok_or(ValueError::NotBufferArgError)?;
            FileData::Bytes(bytes.into())
        }
    };

    let encoding = match (&data, encoding) {
        (FileData::Text(_), None) => Some(Encoding::Utf8),
        (_, encoding) => encoding,
    };

    FileValue::new(filename, data, encoding)
}
