//! In-memory SWMM 5 input model and its line-oriented file format.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Line-oriented `.inp` parser.
pub mod reader;
/// Section field positions and typed record views.
pub mod schema;
pub mod writer;

pub const SUBCATCHMENTS: &str = "SUBCATCHMENTS";
pub const POLYGONS: &str = "POLYGONS";
pub const LID_CONTROLS: &str = "LID_CONTROLS";
pub const LID_USAGE: &str = "LID_USAGE";
pub const OPTIONS: &str = "OPTIONS";
pub const TITLE: &str = "TITLE";

/// Errors reading or writing a model file.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot read \"{path}\": {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write \"{path}\": {source}")]
    Write { path: String, source: io::Error },

    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: malformed section header \"{text}\"")]
    MalformedHeader { line: usize, text: String },
}

/// One record: positional field values plus an optional trailing comment.
///
/// Blank and comment-only lines are records with no values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub values: Vec<String>,
    pub comment: Option<String>,
}

impl Line {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values,
            comment: None,
        }
    }

    pub fn is_data(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Sets field `index`, padding with empty values if the record is short.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if self.values.len() <= index {
            self.values.resize(index + 1, String::new());
        }
        self.values[index] = value.into();
    }
}

/// A named, ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub name: String,
    pub comment: Option<String>,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            lines: Vec::new(),
        }
    }

    /// Records carrying at least one value.
    pub fn data_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.is_data())
    }
}

/// A SWMM input model: sections in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Lines before the first section header.
    pub preamble: Vec<Line>,
    pub sections: Vec<Section>,
}

impl Model {
    /// Reads and parses a model file.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if the file cannot be read or is malformed.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        reader::parse(&text)
    }

    /// Serializes the model to `path`, replacing any existing file.
    ///
    /// The text is rendered in memory first, so a model the format cannot
    /// represent leaves `path` untouched.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if the model cannot be rendered or the file
    /// cannot be created or written.
    pub fn write_to_path(&self, path: &Path) -> Result<(), ModelError> {
        let to_err = |source| ModelError::Write {
            path: path.display().to_string(),
            source,
        };
        let mut text = Vec::new();
        writer::write(self, &mut text).map_err(to_err)?;
        std::fs::write(path, text).map_err(to_err)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns the named section, appending an empty one if absent.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}
