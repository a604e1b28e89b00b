use std::cell::RefCell;
use std::iter;
use std::rc::{Rc, Weak};

use snafu::{Snafu, ensure};
use tracing::{debug, trace};

use super::node::Entry;
use super::{ByteSize, Node, NodeTrait};

/// Size every directory contributes on its own, regardless of its contents.
pub const DIRECTORY_BASE_SIZE: ByteSize = 100;

const PATH_SEPARATOR: char = '/';

#[derive(Debug)]
pub(crate) struct DirectoryData {
    entry: Entry,
    children: Vec<Node>,
}

/// A node owning an ordered list of children.
///
/// Its size is always [`DIRECTORY_BASE_SIZE`] plus the sizes of its current
/// children. The sum is never recomputed: attaching a child or resizing any
/// descendant applies the difference once per ancestor level.
#[derive(Debug, Clone)]
pub struct Directory(Rc<RefCell<DirectoryData>>);

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(DirectoryData {
            entry: Entry::new(name, DIRECTORY_BASE_SIZE),
            children: Vec::new(),
        })))
    }

    /// Appends `child` and grows this directory and all of its ancestors by
    /// the child's size.
    ///
    /// # Panics
    ///
    /// Adding a node that already has a parent, or a directory that is this
    /// one or one of its ancestors, is a contract violation.
    pub fn add_child(&self, child: impl Into<Node>) {
        if let Err(error) = self.try_add_child(child) {
            panic!("{error}");
        }
    }

    /// Adds every node in order. Each one propagates separately.
    pub fn add_children<I>(&self, children: I)
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        for child in children {
            self.add_child(child);
        }
    }

    /// Like [`Directory::add_child`], but reports a broken precondition
    /// instead of panicking. Nothing is modified when an error is returned.
    pub fn try_add_child(&self, child: impl Into<Node>) -> Result<(), AttachError> {
        let child = child.into();

        ensure!(
            !child.is_attached(),
            AlreadyAttachedSnafu { name: child.name() }
        );
        if let Node::Directory(directory) = &child {
            let contains_self = iter::once(self.clone())
                .chain(self.ancestors())
                .any(|ancestor| ancestor.ptr_eq(directory));
            ensure!(
                !contains_self,
                WouldCycleSnafu {
                    name: child.name(),
                    parent: self.name(),
                }
            );
        }

        debug!("Adding '{}' to '{}'", child.name(), self.name());
        child.attach_to(self);
        let child_size = child.byte_size();
        self.0.borrow_mut().children.push(child);

        let grown = self.byte_size().wrapping_add(child_size);
        self.set_byte_size(grown);
        Ok(())
    }

    /// Folds a direct child's size delta into this directory and passes it on.
    pub(crate) fn on_child_size_changed(&self, delta: ByteSize) {
        let size = self.byte_size().wrapping_add(delta);
        trace!("'{}' relaying delta {}", self.name(), delta);
        self.set_byte_size(size);
    }

    fn set_byte_size(&self, new_size: ByteSize) {
        let change = self.0.borrow_mut().entry.replace_byte_size(new_size);
        change.propagate();
    }

    /// Snapshot of the children in insertion order. Changing the returned
    /// vector does not affect the directory.
    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Resolves a `/`-separated path relative to this directory.
    ///
    /// Names are not unique, so every component picks the first child with
    /// a matching name. An empty path resolves to the directory itself.
    pub fn find(&self, path: &str) -> Option<Node> {
        path.split(PATH_SEPARATOR)
            .filter(|component| !component.is_empty())
            .try_fold(Node::Directory(self.clone()), |current, component| {
                current
                    .as_directory()?
                    .child_nodes()
                    .into_iter()
                    .find(|child| child.name() == component)
            })
    }

    /// Parent, grandparent and so on up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Directory> {
        iter::successors(self.parent(), |directory| directory.parent())
    }

    pub fn ptr_eq(&self, other: &Directory) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<DirectoryData>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &Weak<RefCell<DirectoryData>>) -> Option<Self> {
        weak.upgrade().map(Self)
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.0.borrow().entry.is_attached()
    }

    pub(crate) fn attach_to(&self, parent: &Directory) {
        self.0.borrow_mut().entry.attach_to(parent);
    }
}

impl NodeTrait for Directory {
    fn name(&self) -> String {
        self.0.borrow().entry.name().to_string()
    }

    fn byte_size(&self) -> ByteSize {
        self.0.borrow().entry.byte_size()
    }

    fn parent(&self) -> Option<Directory> {
        self.0.borrow().entry.parent()
    }

    fn children(&self) -> Option<Vec<Node>> {
        Some(self.child_nodes())
    }
}

#[derive(Debug, Snafu)]
pub enum AttachError {
    #[snafu(display("'{}' is already a child of another directory", name))]
    AlreadyAttached { name: String },
    #[snafu(display("Adding '{}' to '{}' would make a directory contain itself", name, parent))]
    WouldCycle { name: String, parent: String },
}
