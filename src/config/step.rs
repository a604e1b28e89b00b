use derive_more::Display;
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::{AttachError, ByteSize, Directory, File, NodeTrait};

/// A mutation applied to a built tree, addressed by paths relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Step {
    #[display("add file '{name}' ({size} bytes) under '/{parent}'")]
    AddFile {
        parent: String,
        name: String,
        size: ByteSize,
    },
    #[display("add directory '{name}' under '/{parent}'")]
    AddDirectory { parent: String, name: String },
    #[display("resize '/{path}' to {size} bytes")]
    Resize { path: String, size: ByteSize },
}

impl Step {
    pub fn apply(&self, root: &Directory) -> Result<(), StepError> {
        debug!("Applying step: {}", self);
        match self {
            Step::AddFile { parent, name, size } => Self::directory_at(root, parent)?
                .try_add_child(File::new(name.as_str(), *size))
                .context(AttachSnafu),
            Step::AddDirectory { parent, name } => Self::directory_at(root, parent)?
                .try_add_child(Directory::new(name.as_str()))
                .context(AttachSnafu),
            Step::Resize { path, size } => {
                let node = root.find(path).context(UnknownPathSnafu { path })?;
                let file = node.as_file().context(NotAFileSnafu { path })?;
                file.set_byte_size(*size);
                Ok(())
            }
        }
    }

    fn directory_at(root: &Directory, path: &str) -> Result<Directory, StepError> {
        let node = root.find(path).context(UnknownPathSnafu { path })?;
        debug!("Resolved '/{}' to '{}'", path, node.name());
        node.as_directory()
            .cloned()
            .context(NotADirectorySnafu { path })
    }
}

#[derive(Debug, Snafu)]
pub enum StepError {
    #[snafu(display("No node found at '/{}'", path))]
    UnknownPath { path: String },
    #[snafu(display("'/{}' is not a directory", path))]
    NotADirectory { path: String },
    #[snafu(display("'/{}' is not a file, only files can be resized", path))]
    NotAFile { path: String },
    #[snafu(display("Failed to attach the new node"))]
    AttachError { source: AttachError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn root() -> Directory {
        let root = Directory::new("root");
        let docs = Directory::new("docs");
        root.add_child(docs.clone());
        docs.add_child(File::new("readme.md", 40));
        root
    }

    #[rstest]
    fn add_file_attaches_under_parent(root: Directory) {
        let step = Step::AddFile {
            parent: "docs".into(),
            name: "notes.md".into(),
            size: 60,
        };
        step.apply(&root).expect("step should apply");

        assert_eq!(root.byte_size(), 300);
        let added = root.find("docs/notes.md").expect("notes.md was added");
        assert_eq!(added.byte_size(), 60);
    }

    #[rstest]
    fn add_directory_to_root(root: Directory) {
        let step = Step::AddDirectory {
            parent: String::new(),
            name: "empty".into(),
        };
        step.apply(&root).expect("step should apply");

        assert_eq!(root.byte_size(), 340);
        assert!(root.find("empty").is_some_and(|node| node.is_directory()));
    }

    #[rstest]
    fn resize_changes_file_and_ancestors(root: Directory) {
        let step = Step::Resize {
            path: "docs/readme.md".into(),
            size: 45,
        };
        step.apply(&root).expect("step should apply");

        assert_eq!(root.byte_size(), 245);
        assert_eq!(root.find("docs").map(|node| node.byte_size()), Some(145));
    }

    #[rstest]
    #[case(Step::Resize { path: "missing".into(), size: 1 })]
    #[case(Step::AddFile { parent: "nope".into(), name: "x".into(), size: 1 })]
    fn unknown_paths_are_reported(root: Directory, #[case] step: Step) {
        let result = step.apply(&root);
        assert!(matches!(result, Err(StepError::UnknownPath { .. })));
        assert_eq!(root.byte_size(), 240);
    }

    #[rstest]
    fn resizing_a_directory_is_rejected(root: Directory) {
        let step = Step::Resize {
            path: "docs".into(),
            size: 1,
        };
        let result = step.apply(&root);
        assert!(matches!(result, Err(StepError::NotAFile { .. })));
        assert_eq!(root.byte_size(), 240);
    }

    #[rstest]
    fn adding_into_a_file_is_rejected(root: Directory) {
        let step = Step::AddDirectory {
            parent: "docs/readme.md".into(),
            name: "inner".into(),
        };
        let result = step.apply(&root);
        assert!(matches!(result, Err(StepError::NotADirectory { .. })));
    }

    #[test]
    fn steps_describe_themselves() {
        let step = Step::Resize {
            path: "dir2/dirdir/leaf.txt".into(),
            size: 200,
        };
        assert_eq!(step.to_string(), "resize '/dir2/dirdir/leaf.txt' to 200 bytes");
    }
}
