//! io::errors: failures while loading sample files or preparing folders.
//!
//! Paths are stored as display strings and backend errors as text so that
//! `DataError` stays `Clone + PartialEq` like the other error enums in the
//! crate.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyOSError, PyValueError},
};

/// Result alias for loading and filesystem helpers.
pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    // ---- Filesystem ----
    /// Reading, stating or mapping a file failed.
    #[error("I/O error for {path}: {text}")]
    Io { path: String, text: String },

    /// A path that should be a folder exists as something else.
    #[error("Path {path} exists, but is no directory!")]
    NotADirectory { path: String },

    // ---- Decoding ----
    /// The file is not a readable `.npy` array of a numeric dtype.
    #[error("Could not decode {path} as .npy: {text}")]
    Npy { path: String, text: String },

    // ---- Options ----
    /// The large-value warning threshold must be finite and positive.
    #[error("Invalid warning threshold {value}: must be finite and > 0")]
    InvalidThreshold { value: f64 },
}

impl DataError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        DataError::Io { path: path.display().to_string(), text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DataError> for PyErr {
    fn from(err: DataError) -> PyErr {
        match err {
            DataError::Io { .. } | DataError::NotADirectory { .. } => {
                PyOSError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
