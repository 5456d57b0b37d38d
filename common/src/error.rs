use std::path::PathBuf;

use config::ConfigError;
use thiserror::Error;

use crate::storage::types::document::DocumentKey;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid frontmatter format in file {}", path.display())]
    MalformedDocument { path: PathBuf },
    #[error("Error parsing frontmatter in file {}: {source}", path.display())]
    HeaderDecode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A single document could not be served. The cause is kept so callers
    /// can tell a missing file from a malformed one.
    #[error("document not found: {key}")]
    NotFound {
        key: DocumentKey,
        #[source]
        source: Box<AppError>,
    },
    #[error("Error reading directory {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// True when the underlying cause of a not-found is a file that exists
    /// but could not be parsed.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::MalformedDocument { .. } | Self::HeaderDecode { .. } => true,
            Self::NotFound { source, .. } => source.is_malformed(),
            _ => false,
        }
    }
}
