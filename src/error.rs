use std::path::PathBuf;

/// Errors that can occur when loading or writing an opening book.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("failed to read opening book {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write opening book {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("opening book is empty")]
    Empty,

    #[error("opening book size {len} is not a multiple of the {record_size}-byte record size")]
    Misaligned { len: usize, record_size: usize },

    #[error("unsupported opening book version {0}")]
    UnsupportedVersion(u32),

    #[error("opening book header declares {declared} records but the file holds {actual}")]
    CountMismatch { declared: u32, actual: usize },

    #[error("opening book record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
