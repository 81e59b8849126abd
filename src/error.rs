use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum Error {
    /// Archive retrieval, extraction or parsing failed.
    #[error("could not load dataset: {0}")]
    Load(#[from] LoadError),

    /// A base table required by the query is empty.
    #[error("{0} data not loaded")]
    DataNotLoaded(Table),

    /// A query parameter failed validation; no data was inspected.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// The base tables an operation can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Movies,
    Appearances,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Movies => write!(f, "movie"),
            Table::Appearances => write!(f, "actor"),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    #[error("required file is missing: {}", .0.display())]
    MissingFile(PathBuf),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Argument validation
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    #[error("top-N count must be at least 1, got {0}")]
    TopN(usize),

    #[error("{name} must be a finite number, got {value}")]
    NonFiniteHeight { name: &'static str, value: f64 },

    #[error("height bounds {min}..{max} fall outside the plausible range 1.0..2.5 m")]
    HeightOutOfRange { min: f64, max: f64 },

    #[error("minimum height {min} must be below maximum height {max}")]
    InvertedHeightWindow { min: f64, max: f64 },
}
