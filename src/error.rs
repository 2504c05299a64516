use std::path::PathBuf;

use thiserror::Error;

/// User-facing errors.
#[derive(Error, Debug)]
pub enum InsertFmtError {
    #[error("sqlinsertfmt config error: {0}")]
    Config(String),

    #[error("extension type not supported: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl InsertFmtError {
    /// Attach the offending path to an I/O error.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InsertFmtError>;
