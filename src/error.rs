use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NovelError>;

#[derive(Error, Debug)]
pub enum NovelError {
    #[error("Can't access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: expected {expected} columns, found {found}", .path.display())]
    Arity {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: column {column} has invalid value '{value}'", .path.display())]
    Column {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Failed to read table {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid filter '{0}': {1}")]
    Predicate(String, String),

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Browser page has no hard-copy link at anchor -{offset} ({found} anchors found)")]
    MissingAnchor { offset: usize, found: usize },

    #[error("Can't scan the browser page: {0}")]
    Html(String),

    #[error("Invalid url '{0}': {1}")]
    Url(String, String),
}

impl NovelError {
    /// Attach the offending path to an io error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NovelError::Io {
            path: path.into(),
            source,
        }
    }
}
