use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    io::{Cursor, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::ext::BestEffortPathExt;

pub const CONFIG_FILE_NAME: &str = "vfs.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings loaded from `vfs.yaml` in the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VfsConfig {
    pub text_extensions: Vec<String>,
}

impl VfsConfig {
    /// Reads `<root>/vfs.yaml`, falling back to defaults when it does not exist.
    pub async fn read(root: &Path) -> Result<Self, ConfigError> {
        let path = get_config_file_path(root);
        match Self::from_path(&path).await {
            Err(ConfigError::ReadError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(
                    "No config file at {}, using defaults",
                    path.best_effort_path_display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.best_effort_path_display());
        let file = File::open(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;

        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        let n = res.0.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {n} bytes");

        res.1.as_str().try_into()
    }

    fn parse_text_extensions(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<String>, ConfigError> {
        let Some(section) =
            top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("text_extensions"))))
        else {
            return Ok(Vec::new());
        };

        section
            .as_sequence()
            .context(TextExtensionsNotSequenceSnafu)?
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry.as_str() {
                Some(ext) if !ext.is_empty() => Ok(ext.to_string()),
                _ => InvalidExtensionSnafu { index }.fail(),
            })
            .collect()
    }
}

impl TryFrom<&str> for VfsConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let contents = contents_vec.first().context(MalformedConfigSnafu)?;

        let top_level = contents.as_mapping().context(TopLevelNotMapSnafu)?;
        let text_extensions = Self::parse_text_extensions(top_level)?;
        debug!("Configured text extensions: {:?}", text_extensions);

        Ok(VfsConfig { text_extensions })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("text_extensions should be a list"))]
    TextExtensionsNotSequence,
    #[snafu(display("Entry {} of text_extensions is not a non-empty string", index))]
    InvalidExtension { index: usize },
}
