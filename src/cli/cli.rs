use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Directory holding the optional vfs.yaml config
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Extra extension to always treat as text (repeatable)
    #[clap(long = "text-ext", short = 't', global = true)]
    pub text_ext: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a directory or file as a JSON path map
    Serialize { source: PathBuf },
    /// Write a JSON path map out below an existing directory
    Materialize { encoded: PathBuf, target: PathBuf },
    /// Copy a directory or file below an existing directory
    Copy { source: PathBuf, target: PathBuf },
    /// Print a directory as a tree
    Tree { source: PathBuf },
}
