use std::cell::RefCell;
use std::rc::Rc;

use super::node::Entry;
use super::{ByteSize, Directory, Node, NodeTrait};

/// A leaf node whose size is set directly.
#[derive(Debug, Clone)]
pub struct File(Rc<RefCell<Entry>>);

impl File {
    pub fn new(name: impl Into<String>, byte_size: ByteSize) -> Self {
        Self(Rc::new(RefCell::new(Entry::new(name, byte_size))))
    }

    /// Replaces the size and raises the difference through every ancestor
    /// before returning.
    pub fn set_byte_size(&self, new_size: ByteSize) {
        let change = self.0.borrow_mut().replace_byte_size(new_size);
        change.propagate();
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.0.borrow().is_attached()
    }

    pub(crate) fn attach_to(&self, parent: &Directory) {
        self.0.borrow_mut().attach_to(parent);
    }
}

impl NodeTrait for File {
    fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    fn byte_size(&self) -> ByteSize {
        self.0.borrow().byte_size()
    }

    fn parent(&self) -> Option<Directory> {
        self.0.borrow().parent()
    }

    fn children(&self) -> Option<Vec<Node>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_file_keeps_name_and_size() {
        let file = File::new("f1.txt", 10);
        assert_eq!(file.name(), "f1.txt");
        assert_eq!(file.byte_size(), 10);
        assert!(file.parent().is_none());
        assert!(file.children().is_none());
    }

    #[rstest]
    #[case(10, 200)]
    #[case(10, 0)]
    #[case(0, -5)]
    fn detached_file_accepts_any_size(#[case] initial: ByteSize, #[case] updated: ByteSize) {
        let file = File::new("a.bin", initial);
        file.set_byte_size(updated);
        assert_eq!(file.byte_size(), updated);
    }

    #[test]
    fn clones_share_the_same_file() {
        let file = File::new("shared.txt", 1);
        let handle = file.clone();
        handle.set_byte_size(42);
        assert_eq!(file.byte_size(), 42);
        assert_eq!(File::new("shared.txt", 1).byte_size(), 1);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_name_is_rejected() {
        File::new("", 1);
    }
}
