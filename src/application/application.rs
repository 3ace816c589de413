use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};
use vfs_tree::classify::RegistryError;
use vfs_tree::codec::{DeserializeError, SerializeError};
use vfs_tree::config::ConfigError;
use vfs_tree::ext::BestEffortPathExt;
use vfs_tree::filesystem::{ActualizeError, VirtualizeError};
use vfs_tree::{Encoded, Vfs, VfsConfig};

use crate::application::RuntimeConfig;
use crate::application::render::render;
use crate::cli::Command;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let output = Self::execute(&app_config).await?;
        print!("{output}");
        Ok(())
    }

    /// Runs the configured command and returns what it prints.
    pub async fn execute(app_config: &RuntimeConfig) -> Result<String, ApplicationError> {
        let vfs = Self::build_vfs(app_config).await?;

        match &app_config.command {
            Command::Serialize { source } => {
                let tree = vfs.virtualize(source).await.context(VirtualizeSnafu)?;
                let encoded = vfs.serialize(&tree).context(SerializeSnafu)?;
                let json = serde_json::to_string_pretty(&encoded).context(JsonSnafu)?;
                Ok(format!("{json}\n"))
            }
            Command::Materialize { encoded, target } => {
                let encoded = Self::read_encoded(encoded).await?;
                let tree = vfs.deserialize(&encoded).context(DeserializeSnafu)?;
                vfs.actualize(&tree, tree.root(), target)
                    .await
                    .context(ActualizeSnafu)?;
                info!(
                    "Materialized {} entries into {}",
                    encoded.len(),
                    target.best_effort_path_display()
                );
                Ok(String::new())
            }
            Command::Copy { source, target } => {
                let tree = vfs.virtualize(source).await.context(VirtualizeSnafu)?;
                vfs.actualize(&tree, tree.root(), target)
                    .await
                    .context(ActualizeSnafu)?;
                Ok(String::new())
            }
            Command::Tree { source } => {
                let tree = vfs.virtualize(source).await.context(VirtualizeSnafu)?;
                let use_color = supports_color::on(supports_color::Stream::Stdout).is_some();
                colored::control::set_override(use_color);
                Ok(render(&tree, tree.root(), use_color))
            }
        }
    }

    async fn build_vfs(app_config: &RuntimeConfig) -> Result<Vfs, ApplicationError> {
        let config = VfsConfig::read(&app_config.root)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let mut vfs = Vfs::from_config(&config).context(RegistrySnafu)?;
        for ext in &app_config.text_extensions {
            vfs.register_text(ext).context(RegistrySnafu)?;
        }
        Ok(vfs)
    }

    async fn read_encoded(path: &Path) -> Result<Encoded, ApplicationError> {
        let contents = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        serde_json::from_slice(&contents).context(JsonSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Invalid text extension"))]
    RegistryError { source: RegistryError },
    #[snafu(display("Failed to read {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Invalid JSON path map"))]
    JsonError { source: serde_json::Error },
    #[snafu(display("Failed to read the source tree"))]
    VirtualizeError { source: VirtualizeError },
    #[snafu(display("Failed to write the tree"))]
    ActualizeError { source: ActualizeError },
    #[snafu(display("Failed to serialize the tree"))]
    SerializeError { source: SerializeError },
    #[snafu(display("Failed to deserialize the path map"))]
    DeserializeError { source: DeserializeError },
}
