use std::fmt;
use std::path::PathBuf;

/// Why there is no prediction to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryGap {
    /// The history file has never been written.
    Missing,
    /// The file exists but holds no rows, e.g. after a clear.
    Empty,
}

impl fmt::Display for HistoryGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryGap::Missing => f.write_str("Henüz geçmiş verisi yok."),
            HistoryGap::Empty => {
                f.write_str("PDF oluşturmak için geçmişte tahmin yapılmış olmalı.")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KaygiError {
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("prediction is unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    InputValidation {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("feature row has {actual} values but the model declares {expected} features")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("model produced unknown category {0} (expected 0, 1 or 2)")]
    UnknownCategory(i64),

    #[error("{0}")]
    NoHistory(HistoryGap),

    #[error("Geçerli bir e-posta adresi girin. ('{0}')")]
    InvalidAddress(String),

    #[error("history store {path} could not be accessed: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history store {path} is unreadable: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("failed to load report font from {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("failed to render report: {0}")]
    Render(String),

    #[error("failed to load settings from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KaygiError {
    /// True for outcomes the user should see as a notice rather than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, KaygiError::NoHistory(_))
    }

    pub(crate) fn store_io(path: &std::path::Path, source: std::io::Error) -> Self {
        KaygiError::StoreIo {
            path: path.to_path_buf(),
            source,
        }
    }
}
