//! In-memory filesystem tree with incrementally maintained sizes.
//!
//! Every node reports a cumulative byte size. Resizing a file raises the
//! signed difference to its parent directory, which folds it into its own
//! size and raises it further, so every ancestor stays consistent without
//! ever summing a subtree from scratch.

mod directory;
mod file;
mod node;
mod tree;

pub use directory::{AttachError, Directory};
pub use file::File;
pub use node::{ByteSize, Node, NodeTrait};
pub use tree::{TreeOrder, tree_lines};
