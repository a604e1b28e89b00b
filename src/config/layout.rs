use std::borrow::Cow;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::config::Step;
use crate::filesystem::{ByteSize, Directory, File, Node};

/// Layout used when no file is given: the sample tree, one new leaf and one
/// resize of that leaf.
const DEMO_LAYOUT: &str = r#"
tree:
  name: root
  children:
    - directory: dir1
    - directory: dir2
      children:
        - directory: dirdir
        - file: g1.txt
          size: 20
    - file: f1.txt
      size: 10
steps:
  - add_file:
      parent: dir2/dirdir
      name: leaf.txt
      size: 100
  - resize:
      path: dir2/dirdir/leaf.txt
      size: 200
"#;

type Mapping<'a> = LinkedHashMap<Yaml<'a>, Yaml<'a>>;

/// Description of a node to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLayout {
    File { name: String, size: ByteSize },
    Directory {
        name: String,
        children: Vec<EntryLayout>,
    },
}

impl EntryLayout {
    pub fn build(&self) -> Node {
        match self {
            EntryLayout::File { name, size } => File::new(name.as_str(), *size).into(),
            EntryLayout::Directory { name, children } => {
                Self::build_directory(name, children).into()
            }
        }
    }

    fn build_directory(name: &str, children: &[EntryLayout]) -> Directory {
        let directory = Directory::new(name);
        directory.add_children(children.iter().map(EntryLayout::build));
        directory
    }
}

/// A tree to build plus the steps to replay on it, read from YAML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    root_name: String,
    children: Vec<EntryLayout>,
    steps: Vec<Step>,
}

impl TreeLayout {
    pub async fn read(path: &Path) -> Result<Self, LayoutError> {
        let file_path = path.display().to_string();
        debug!("Reading layout file: {}", file_path);
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: file_path.as_str(),
        })?;
        debug!("Successfully read layout file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu { file_path })?;
        contents.as_str().try_into()
    }

    /// Reads the layout at `path`, or the built-in demo when there is none.
    pub async fn from_path(path: Option<PathBuf>) -> Result<Self, LayoutError> {
        match path {
            Some(path) => Self::read(&path).await,
            None => Self::default_demo(),
        }
    }

    pub fn default_demo() -> Result<Self, LayoutError> {
        DEMO_LAYOUT.try_into()
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn build(&self) -> Directory {
        EntryLayout::build_directory(&self.root_name, &self.children)
    }

    fn parse_entries(
        mapping: &Mapping,
        location: &str,
    ) -> Result<Vec<EntryLayout>, LayoutError> {
        let Some(children) = get(mapping, "children") else {
            return Ok(Vec::new());
        };
        if is_null(children) {
            return Ok(Vec::new());
        }

        children
            .as_sequence()
            .context(ChildrenNotSequenceSnafu { location })?
            .iter()
            .enumerate()
            .map(|(index, child)| {
                Self::parse_entry(child, &format!("{location}/children[{index}]"))
            })
            .collect()
    }

    fn parse_entry(entry: &Yaml, location: &str) -> Result<EntryLayout, LayoutError> {
        let mapping = entry
            .as_mapping()
            .context(InvalidEntrySnafu { location })?;

        if let Some(name) = get(mapping, "directory") {
            let name = parse_name(name, location)?;
            let children = Self::parse_entries(mapping, location)?;
            return Ok(EntryLayout::Directory { name, children });
        }

        let name = get(mapping, "file").context(InvalidEntrySnafu { location })?;
        let name = parse_name(name, location)?;
        let size = get(mapping, "size").context(MissingSizeSnafu { location })?;
        let size = parse_size(size, location)?;
        Ok(EntryLayout::File { name, size })
    }

    fn parse_steps(top_level: &Mapping) -> Result<Vec<Step>, LayoutError> {
        let Some(steps) = get(top_level, "steps") else {
            return Ok(Vec::new());
        };
        if is_null(steps) {
            return Ok(Vec::new());
        }

        steps
            .as_sequence()
            .context(StepsNotSequenceSnafu)?
            .iter()
            .enumerate()
            .map(|(index, step)| Self::parse_step(step, &format!("steps[{index}]")))
            .collect()
    }

    fn parse_step(step: &Yaml, location: &str) -> Result<Step, LayoutError> {
        let (kind, fields) = step
            .as_mapping()
            .filter(|mapping| mapping.len() == 1)
            .and_then(|mapping| mapping.iter().next())
            .context(InvalidStepSnafu { location })?;
        let kind = kind.as_str().context(InvalidStepSnafu { location })?;
        let fields = fields.as_mapping().context(InvalidStepSnafu { location })?;

        let field = |name: &'static str| {
            get(fields, name).context(MissingFieldSnafu {
                location,
                field: name,
            })
        };
        let path_field =
            |name: &'static str| field(name).and_then(|value| parse_path(value, location));

        match kind {
            "add_file" => Ok(Step::AddFile {
                parent: path_field("parent")?,
                name: parse_name(field("name")?, location)?,
                size: parse_size(field("size")?, location)?,
            }),
            "add_directory" => Ok(Step::AddDirectory {
                parent: path_field("parent")?,
                name: parse_name(field("name")?, location)?,
            }),
            "resize" => Ok(Step::Resize {
                path: path_field("path")?,
                size: parse_size(field("size")?, location)?,
            }),
            _ => UnknownStepSnafu { location, kind }.fail(),
        }
    }
}

impl TryFrom<&str> for TreeLayout {
    type Error = LayoutError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedLayoutSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let tree = get(top_level, "tree")
            .context(MissingTreeSnafu)?
            .as_mapping()
            .context(InvalidEntrySnafu { location: "tree" })?;
        let root_name = get(tree, "name").context(MissingFieldSnafu {
            location: "tree",
            field: "name",
        })?;
        let root_name = parse_name(root_name, "tree")?;
        let children = Self::parse_entries(tree, "tree")?;
        let steps = Self::parse_steps(top_level)?;

        debug!(
            "Parsed layout '{}' with {} top-level entries and {} steps",
            root_name,
            children.len(),
            steps.len()
        );
        Ok(TreeLayout {
            root_name,
            children,
            steps,
        })
    }
}

fn get<'m, 'a>(mapping: &'m Mapping<'a>, key: &'a str) -> Option<&'m Yaml<'a>> {
    mapping.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
}

fn is_null(value: &Yaml) -> bool {
    matches!(value, Yaml::Value(Scalar::Null))
}

fn parse_name(value: &Yaml, location: &str) -> Result<String, LayoutError> {
    value
        .as_str()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .context(InvalidNameSnafu { location })
}

fn parse_path(value: &Yaml, location: &str) -> Result<String, LayoutError> {
    value
        .as_str()
        .map(str::to_string)
        .context(InvalidPathSnafu { location })
}

fn parse_size(value: &Yaml, location: &str) -> Result<ByteSize, LayoutError> {
    match value {
        Yaml::Value(Scalar::Integer(size)) => Ok(*size),
        _ => InvalidSizeSnafu { location }.fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum LayoutError {
    #[snafu(display("Failed to read the layout file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The layout file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the layout"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted layout"))]
    MalformedLayout,
    #[snafu(display("Top level of the layout should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The layout has no 'tree' section"))]
    MissingTree,
    #[snafu(display("Entry at {} should be a map with a 'directory' or 'file' key", location))]
    InvalidEntry { location: String },
    #[snafu(display("Children of {} should be a list", location))]
    ChildrenNotSequence { location: String },
    #[snafu(display("Name at {} should be a non-empty string", location))]
    InvalidName { location: String },
    #[snafu(display("File at {} has no 'size'", location))]
    MissingSize { location: String },
    #[snafu(display("Size at {} should be an integer", location))]
    InvalidSize { location: String },
    #[snafu(display("Steps section should be a list"))]
    StepsNotSequence,
    #[snafu(display("Step at {} should be a map with exactly one step kind", location))]
    InvalidStep { location: String },
    #[snafu(display("Unknown step '{}' at {}", kind, location))]
    UnknownStep { location: String, kind: String },
    #[snafu(display("{} is missing the '{}' field", location, field))]
    MissingField { location: String, field: String },
    #[snafu(display("Path at {} should be a string", location))]
    InvalidPath { location: String },
}
