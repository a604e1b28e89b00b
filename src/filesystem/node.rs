use std::cell::RefCell;
use std::rc::Weak;

use derive_more::{From, IsVariant};
use tracing::trace;

use super::directory::DirectoryData;
use super::{Directory, File};

/// Signed size metric. Negative values are accepted as-is and arithmetic on
/// it wraps, so a resize can never fail halfway up the tree.
pub type ByteSize = i64;

/// Read access shared by every node of the tree.
pub trait NodeTrait {
    fn name(&self) -> String;
    fn byte_size(&self) -> ByteSize;
    /// The directory observing this node's size changes, if it is still alive.
    fn parent(&self) -> Option<Directory>;
    /// `None` for files, the children in insertion order for directories.
    fn children(&self) -> Option<Vec<Node>>;
}

/// A file or a directory. Cloning yields another handle to the same node.
#[derive(Debug, Clone, From, IsVariant)]
pub enum Node {
    File(File),
    Directory(Directory),
}

impl Node {
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::File(_) => None,
            Node::Directory(directory) => Some(directory),
        }
    }

    /// True once the node has been added to a directory, even if that
    /// directory has since been dropped.
    pub(crate) fn is_attached(&self) -> bool {
        match self {
            Node::File(file) => file.is_attached(),
            Node::Directory(directory) => directory.is_attached(),
        }
    }

    pub(crate) fn attach_to(&self, parent: &Directory) {
        match self {
            Node::File(file) => file.attach_to(parent),
            Node::Directory(directory) => directory.attach_to(parent),
        }
    }
}

impl NodeTrait for Node {
    fn name(&self) -> String {
        match self {
            Node::File(file) => file.name(),
            Node::Directory(directory) => directory.name(),
        }
    }

    fn byte_size(&self) -> ByteSize {
        match self {
            Node::File(file) => file.byte_size(),
            Node::Directory(directory) => directory.byte_size(),
        }
    }

    fn parent(&self) -> Option<Directory> {
        match self {
            Node::File(file) => file.parent(),
            Node::Directory(directory) => directory.parent(),
        }
    }

    fn children(&self) -> Option<Vec<Node>> {
        match self {
            Node::File(file) => file.children(),
            Node::Directory(directory) => NodeTrait::children(directory),
        }
    }
}

/// State common to files and directories.
#[derive(Debug)]
pub(crate) struct Entry {
    name: String,
    byte_size: ByteSize,
    parent: Option<Weak<RefCell<DirectoryData>>>,
}

impl Entry {
    /// # Panics
    ///
    /// An empty name is a contract violation.
    pub(crate) fn new(name: impl Into<String>, byte_size: ByteSize) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "node names must not be empty");
        Self {
            name,
            byte_size,
            parent: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn byte_size(&self) -> ByteSize {
        self.byte_size
    }

    pub(crate) fn parent(&self) -> Option<Directory> {
        self.parent.as_ref().and_then(Directory::upgrade)
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn attach_to(&mut self, parent: &Directory) {
        self.parent = Some(parent.downgrade());
    }

    /// Stores `new_size` and hands back the change still to be raised to the
    /// parent. The caller must release its borrow before propagating.
    pub(crate) fn replace_byte_size(&mut self, new_size: ByteSize) -> SizeChange {
        let delta = new_size.wrapping_sub(self.byte_size);
        self.byte_size = new_size;
        trace!(
            "'{}' resized to {} bytes (delta {})",
            self.name, new_size, delta
        );
        SizeChange {
            delta,
            parent: self.parent(),
        }
    }
}

/// A size delta that has been applied locally but not yet to the ancestors.
#[must_use = "the delta has to be propagated to keep ancestor sizes consistent"]
pub(crate) struct SizeChange {
    delta: ByteSize,
    parent: Option<Directory>,
}

impl SizeChange {
    pub(crate) fn propagate(self) {
        if let Some(parent) = self.parent {
            parent.on_child_size_changed(self.delta);
        }
    }
}
