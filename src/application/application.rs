use std::io::{self, Write};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{LayoutError, StepError, TreeLayout};
use crate::filesystem::{Directory, NodeTrait, TreeOrder, tree_lines};

/// Printed before every rendering of the tree.
pub const SEPARATOR: &str = "--------------------------------";

/// How the tree is rendered on every print.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintStyle {
    pub colored: bool,
    pub order: TreeOrder,
}

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let layout = TreeLayout::from_path(app_config.layout.clone())
            .await
            .context(LayoutSnafu)?;
        debug!("Loaded layout: {:?}", layout);

        let style = PrintStyle {
            colored: app_config.color.should_colorize(),
            order: app_config.order.to_tree_order(),
        };
        colored::control::set_override(style.colored);

        let stdout = io::stdout();
        let root = Self::replay(&layout, &mut stdout.lock(), style)?;
        info!(
            "Finished with '{}' at {} bytes",
            root.name(),
            root.byte_size()
        );

        Ok(())
    }

    /// Builds the layout's tree and prints it, then applies each step and
    /// prints the tree again after every one of them.
    pub fn replay(
        layout: &TreeLayout,
        out: &mut impl Write,
        style: PrintStyle,
    ) -> Result<Directory, ApplicationError> {
        let root = layout.build();
        info!(
            "Built tree '{}' with {} bytes",
            layout.root_name(),
            root.byte_size()
        );
        Self::print_tree(&root, out, style)?;

        for step in layout.steps() {
            step.apply(&root).context(StepSnafu {
                step: step.to_string(),
            })?;
            info!("Applied {}, root is now {} bytes", step, root.byte_size());
            Self::print_tree(&root, out, style)?;
        }

        Ok(root)
    }

    fn print_tree(
        root: &Directory,
        out: &mut impl Write,
        style: PrintStyle,
    ) -> Result<(), ApplicationError> {
        writeln!(out, "{SEPARATOR}").context(OutputSnafu)?;
        for line in tree_lines(root.clone(), "").with_order(style.order) {
            writeln!(out, "{}", line.render(style.colored)).context(OutputSnafu)?;
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the layout"))]
    LayoutError { source: LayoutError },
    #[snafu(display("Failed to {}", step))]
    StepError { step: String, source: StepError },
    #[snafu(display("Failed to write the tree"))]
    OutputError { source: io::Error },
}
