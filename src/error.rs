//! Error types for template resolution and outline parsing
//!
//! Every structural error carries the 1-based physical line number of the
//! offending line. Parsing is single pass: the first error aborts the run and
//! no partial tree is returned.

use thiserror::Error;

/// Errors raised while resolving placeholders or building the outline tree
#[derive(Error, Debug)]
pub enum Error {
    /// A line is indented more than one level deeper than the line before it
    #[error("line {line}: indentation jumps to depth {depth}, at most {expected_max} is allowed here")]
    MalformedIndentation {
        line: usize,
        depth: usize,
        expected_max: usize,
    },

    /// `@start` or `@due` was written without a parenthesized value
    #[error("line {line}: tag @{tag} requires a value, e.g. @{tag}(2018-09-01)")]
    MissingTagValue { line: usize, tag: String },

    /// A checklist item was nested under another checklist item
    #[error("line {line}: checklist items cannot be nested under other checklist items")]
    InvalidNesting { line: usize },

    /// A placeholder token survived substitution
    #[error("line {line}: placeholder ${name} was not resolved")]
    UnresolvedPlaceholder { line: usize, name: String },

    /// The first line of the document does not declare a project
    #[error("line {line}: the first line must declare a project, e.g. 'Project name:'")]
    RootNotProject { line: usize },

    /// The document has no content at all
    #[error("document is empty")]
    EmptyDocument,

    /// The value source could not read a placeholder value
    #[error("failed to read placeholder value: {0}")]
    Prompt(#[from] std::io::Error),
}

impl Error {
    /// Line number the error refers to, if it is tied to a line
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedIndentation { line, .. }
            | Error::MissingTagValue { line, .. }
            | Error::InvalidNesting { line }
            | Error::UnresolvedPlaceholder { line, .. }
            | Error::RootNotProject { line } => Some(*line),
            Error::EmptyDocument | Error::Prompt(_) => None,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
