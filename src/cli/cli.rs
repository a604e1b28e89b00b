use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorChoice, LogLevel, PrintOrder};

/// Builds a directory tree, replays size changes on it and prints the tree
/// after every change.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML layout with the tree and the steps to replay. Uses the built-in
    /// sample when omitted
    pub layout: Option<PathBuf>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// When to colour the printed tree
    #[clap(long, default_value = "auto", value_enum)]
    pub color: ColorChoice,

    /// Order of the children under each directory
    #[clap(long, default_value = "insertion", value_enum)]
    pub order: PrintOrder,
}
