use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use snafu::{Snafu, ensure};

const MAX_FILENAME_LENGTH: usize = 255;
const RESERVED_CHARACTERS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const RESERVED_DEVICE_NAMES: [&str; 4] = ["con", "prn", "aux", "nul"];

/// A single path segment that is a valid file name on every common platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Filename(String);

impl Filename {
    pub fn parse(name: impl Into<String>) -> Result<Self, FilenameError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(name: &str) -> Result<(), FilenameError> {
    ensure!(!name.is_empty(), EmptySnafu);
    ensure!(
        name.chars().count() <= MAX_FILENAME_LENGTH,
        TooLongSnafu { name }
    );
    ensure!(name != "." && name != "..", RelativeSnafu { name });
    if let Some(character) = name
        .chars()
        .find(|c| RESERVED_CHARACTERS.contains(c) || (*c as u32) < 0x20)
    {
        return ReservedCharacterSnafu { name, character }.fail();
    }
    ensure!(!is_device_name(name), DeviceNameSnafu { name });
    Ok(())
}

fn is_device_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if RESERVED_DEVICE_NAMES.contains(&lower.as_str()) {
        return true;
    }
    match lower.strip_prefix("com").or_else(|| lower.strip_prefix("lpt")) {
        Some(rest) => rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

impl TryFrom<String> for Filename {
    type Error = FilenameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}

impl TryFrom<&str> for Filename {
    type Error = FilenameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}

impl From<Filename> for String {
    fn from(filename: Filename) -> Self {
        filename.0
    }
}

impl Deref for Filename {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Filename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Snafu)]
pub enum FilenameError {
    #[snafu(display("Expected filename to be non empty"))]
    EmptyError,
    #[snafu(display("Filename '{}' is longer than {} characters", name, MAX_FILENAME_LENGTH))]
    TooLongError { name: String },
    #[snafu(display("Filename '{}' is a relative path marker", name))]
    RelativeError { name: String },
    #[snafu(display("Filename '{}' contains reserved character {:?}", name, character))]
    ReservedCharacterError { name: String, character: char },
    #[snafu(display("Filename '{}' is a reserved device name", name))]
    DeviceNameError { name: String },
}
