use colored::Colorize;
use derive_more::Display;

use super::{ByteSize, Node, NodeTrait};

/// Indentation added for every level below the starting node.
pub const INDENT_UNIT: &str = "  ";

/// Order in which a directory's children are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeOrder {
    /// Children exactly as they were added
    #[default]
    Insertion,
    /// Sub-directories first, then files, each group keeping insertion order
    DirectoriesFirst,
}

impl TreeOrder {
    fn arrange(self, children: Vec<Node>) -> Vec<Node> {
        match self {
            TreeOrder::Insertion => children,
            TreeOrder::DirectoriesFirst => {
                let (mut directories, files): (Vec<_>, Vec<_>) =
                    children.into_iter().partition(Node::is_directory);
                directories.extend(files);
                directories
            }
        }
    }
}

/// One rendered node of a tree walk.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{indent} {name} {byte_size} bytes")]
pub struct TreeLine {
    pub indent: String,
    pub name: String,
    pub byte_size: ByteSize,
    pub is_directory: bool,
}

impl TreeLine {
    /// Renders the line, highlighting directories when `colored` is set.
    pub fn render(&self, colored: bool) -> String {
        if !colored {
            return self.to_string();
        }

        let name = if self.is_directory {
            self.name.bold().blue()
        } else {
            self.name.normal()
        };
        let size = format!("{} bytes", self.byte_size).dimmed();
        format!("{} {} {}", self.indent, name, size)
    }
}

/// Lazy depth-first, pre-order walk over a tree.
///
/// Sizes are read when a node is reached, so a fresh walk after a mutation
/// reflects the new state.
#[derive(Debug, Clone)]
pub struct TreeLines {
    indent: String,
    order: TreeOrder,
    pending: Vec<(Node, usize)>,
}

impl TreeLines {
    pub fn with_order(mut self, order: TreeOrder) -> Self {
        self.order = order;
        self
    }
}

impl Iterator for TreeLines {
    type Item = TreeLine;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.pending.pop()?;

        let children = node.children().map(|children| self.order.arrange(children));
        if let Some(children) = &children {
            self.pending
                .extend(children.iter().rev().map(|child| (child.clone(), depth + 1)));
        }

        Some(TreeLine {
            indent: format!("{}{}", self.indent, INDENT_UNIT.repeat(depth)),
            name: node.name(),
            byte_size: node.byte_size(),
            is_directory: children.is_some(),
        })
    }
}

/// Walks `root` and everything below it, prefixing each line with `indent`
/// plus two spaces per level.
pub fn tree_lines(root: impl Into<Node>, indent: &str) -> TreeLines {
    TreeLines {
        indent: indent.to_string(),
        order: TreeOrder::default(),
        pending: vec![(root.into(), 0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{Directory, File};
    use rstest::*;

    #[fixture]
    fn root() -> Directory {
        let root = Directory::new("root");
        let dir2 = Directory::new("dir2");
        root.add_child(Directory::new("dir1"));
        root.add_child(dir2.clone());
        root.add_child(File::new("f1.txt", 10));
        dir2.add_children([
            Node::from(Directory::new("dirdir")),
            Node::from(File::new("g1.txt", 20)),
        ]);
        root
    }

    fn render(root: &Directory) -> Vec<String> {
        tree_lines(root.clone(), "")
            .map(|line| line.to_string())
            .collect()
    }

    #[rstest]
    fn renders_pre_order_with_indentation(root: Directory) {
        assert_eq!(
            render(&root),
            [
                " root 430 bytes",
                "   dir1 100 bytes",
                "   dir2 220 bytes",
                "     dirdir 100 bytes",
                "     g1.txt 20 bytes",
                "   f1.txt 10 bytes",
            ]
        );
    }

    #[rstest]
    fn indent_grows_with_nesting(root: Directory) {
        let widths: Vec<_> = tree_lines(root, "").map(|line| line.indent.len()).collect();
        assert_eq!(widths, [0, 2, 2, 4, 4, 2]);
    }

    #[test]
    fn directories_first_groups_each_level() {
        let root = Directory::new("root");
        let docs = Directory::new("docs");
        root.add_child(File::new("a.txt", 1));
        root.add_child(docs.clone());
        root.add_child(File::new("b.txt", 2));
        root.add_child(Directory::new("bin"));
        docs.add_child(File::new("readme.md", 3));
        docs.add_child(Directory::new("img"));

        let names: Vec<_> = tree_lines(root.clone(), "")
            .with_order(TreeOrder::DirectoriesFirst)
            .map(|line| line.to_string())
            .collect();
        assert_eq!(
            names,
            [
                " root 406 bytes",
                "   docs 203 bytes",
                "     img 100 bytes",
                "     readme.md 3 bytes",
                "   bin 100 bytes",
                "   a.txt 1 bytes",
                "   b.txt 2 bytes",
            ]
        );

        let insertion: Vec<_> = tree_lines(root, "").map(|line| line.name).collect();
        assert_eq!(
            insertion,
            ["root", "a.txt", "docs", "readme.md", "img", "b.txt", "bin"]
        );
    }

    #[rstest]
    fn starting_indent_prefixes_every_line(root: Directory) {
        let lines: Vec<_> = tree_lines(root, ">").map(|line| line.indent).collect();
        assert_eq!(lines, [">", ">  ", ">  ", ">    ", ">    ", ">  "]);
    }

    #[test]
    fn single_file_yields_one_line() {
        let lines: Vec<_> = tree_lines(File::new("alone.txt", 7), "  ").collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "   alone.txt 7 bytes");
        assert!(!lines[0].is_directory);
    }

    #[rstest]
    fn repeated_walks_are_identical(root: Directory) {
        assert_eq!(render(&root), render(&root));
    }

    #[rstest]
    fn new_walk_sees_mutations(root: Directory) {
        let before = render(&root);

        let g1 = root
            .find("dir2/g1.txt")
            .and_then(|node| node.as_file().cloned())
            .expect("g1.txt exists");
        g1.set_byte_size(25);

        let after = render(&root);
        assert_ne!(before, after);
        assert_eq!(after[0], " root 435 bytes");
        assert_eq!(after[2], "   dir2 225 bytes");
        assert_eq!(after[4], "     g1.txt 25 bytes");
        assert_eq!(after[1], before[1]);
    }

    #[rstest]
    fn walk_is_lazy(root: Directory) {
        let mut lines = tree_lines(root.clone(), "");
        let first = lines.next().expect("root line");
        assert_eq!(first.name, "root");

        let dir2 = root
            .find("dir2")
            .and_then(|node| node.as_directory().cloned())
            .expect("dir2 exists");
        dir2.add_child(File::new("late.txt", 1));

        let rest: Vec<_> = lines.map(|line| line.to_string()).collect();
        assert_eq!(
            rest,
            [
                "   dir1 100 bytes",
                "   dir2 221 bytes",
                "     dirdir 100 bytes",
                "     g1.txt 20 bytes",
                "     late.txt 1 bytes",
                "   f1.txt 10 bytes",
            ]
        );
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn render_keeps_the_text(root: Directory, #[case] colored: bool) {
        colored::control::set_override(colored);
        let line = tree_lines(root, "").next().expect("root line");
        let rendered = line.render(colored);
        assert!(rendered.contains("root"));
        assert!(rendered.contains("430 bytes"));
        colored::control::unset_override();
    }
}
