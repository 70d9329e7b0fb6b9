// Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to decode {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported audio format in {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    #[error("cannot normalize '{name}': signal is silent (peak amplitude is zero)")]
    DegenerateSignal { name: String },

    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported feature configuration: {0}")]
    UnsupportedConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type AudioResult<T> = Result<T, AudioError>;
