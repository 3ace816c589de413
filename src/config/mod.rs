mod vfs_config;

pub use vfs_config::{CONFIG_FILE_NAME, ConfigError, VfsConfig};
