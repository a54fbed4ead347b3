use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("IO error: {source} ({path})")]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid table line {line} '{content}': {message}")]
    Parse {
        line: usize,
        content: String,
        message: String,
    },

    #[error("Motif length mismatch at line {line}: expected {expected}, found {found}")]
    MotifLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Table is not in descending energy order at line {line}: {current} follows {previous}")]
    Unsorted {
        line: usize,
        previous: f32,
        current: f32,
    },

    #[error("Empty motif table: {0}")]
    EmptyTable(PathBuf),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Wrap an `io::Error` with the path it came from
    pub fn io(source: io::Error, path: impl Into<PathBuf>) -> Self {
        MotifError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new Parse error for a table line
    pub fn parse(line: usize, content: impl Into<String>, message: impl Into<String>) -> Self {
        MotifError::Parse {
            line,
            content: content.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        MotifError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
