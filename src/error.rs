//! Error types for stub generation

use std::fmt;

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Generator errors
#[derive(Error, Debug)]
pub enum GenError {
    /// A schema file's own output-module hint cannot name a package.
    #[error("configuration error in {file}: {reason}")]
    Configuration { file: String, reason: String },

    #[error("multiple errors occurred:\n{}", join_lines(.0))]
    MultipleFiles(Vec<FileError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid alias stoplist pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl GenError {
    pub fn configuration(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// True for the per-file failure that stops a single file's context.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// A failure attached to the schema file that produced it.
#[derive(Debug)]
pub struct FileError {
    pub path: String,
    pub error: GenError,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processing {}: {}", self.path, self.error)
    }
}

fn join_lines(errors: &[FileError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
