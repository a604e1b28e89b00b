use std::path::PathBuf;

use crate::application::data::{ColorChoice, PrintOrder};
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Layout file to load, the built-in demo when absent
    pub layout: Option<PathBuf>,
    pub color: ColorChoice,
    pub order: PrintOrder,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            layout: cli.layout,
            color: cli.color,
            order: cli.order,
        }
    }
}
