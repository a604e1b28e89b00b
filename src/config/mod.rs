//! YAML layouts describing a tree to build and the mutations to replay on it.

mod layout;
mod step;

pub use layout::{LayoutError, TreeLayout};
pub use step::{Step, StepError};
