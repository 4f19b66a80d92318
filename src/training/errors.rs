//! training::errors: unified error surface for method, loss and optimizer
//! selection.
//!
//! Name-based lookups (`"carl"`, `"amsgrad"`, `"relu"`, ...) fail with a
//! variant that echoes the rejected name and lists the valid choices.
//! Numeric configuration and batch-shape problems carry the offending
//! values.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for the training helpers.
pub type TrainingResult<T> = Result<T, TrainingError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    // ---- Name lookups ----
    /// Unknown inference method.
    #[error("Unknown method {name}: {reason}")]
    UnknownMethod { name: String, reason: &'static str },

    /// Unknown optimizer.
    #[error("Unknown optimizer {name}: {reason}")]
    UnknownOptimizer { name: String, reason: &'static str },

    /// Unknown activation function.
    #[error("Activation function {name} unknown: {reason}")]
    UnknownActivation { name: String, reason: &'static str },

    // ---- Numeric configuration ----
    /// Score-loss weight must be finite and non-negative.
    #[error("Invalid alpha {value}: must be finite and non-negative")]
    InvalidAlpha { value: f64 },

    /// Learning rate must be finite and positive.
    #[error("Invalid learning rate {value}: must be finite and > 0")]
    InvalidLearningRate { value: f64 },

    /// Momentum must lie in `[0, 1)`.
    #[error("Invalid momentum {value}: must be in [0, 1)")]
    InvalidMomentum { value: f64 },

    // ---- Batches and parameters ----
    /// Arrays in a loss batch or an optimizer step disagree in shape.
    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch { what: &'static str, expected: Vec<usize>, found: Vec<usize> },

    /// A loss term needs an input the batch does not carry.
    #[error("Loss term {term} requires {input}, which is missing from the batch")]
    MissingInput { term: &'static str, input: &'static str },

    /// A loss batch has no events.
    #[error("Loss batch is empty")]
    EmptyBatch,
}

#[cfg(feature = "python-bindings")]
impl From<TrainingError> for PyErr {
    fn from(err: TrainingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
