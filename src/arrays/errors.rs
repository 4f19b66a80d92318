//! arrays::errors: error surface for array cleaning, quantiles and resampling.
//!
//! Every variant carries the offending value or index so that callers can
//! report failures without holding on to the input arrays. Under the
//! `python-bindings` feature all variants surface as `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for array routines.
pub type ArrayResult<T> = Result<T, ArrayError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    // ---- Sanitize ----
    /// A clipping bound is NaN.
    #[error("Invalid clipping bound {name}: value is NaN")]
    NanBound { name: &'static str },

    /// `min_value > max_value`.
    #[error("Invalid clipping bounds: min_value {min} is larger than max_value {max}")]
    InvertedBounds { min: f64, max: f64 },

    // ---- Weighted quantile ----
    /// No values were supplied.
    #[error("Cannot compute quantiles of an empty array")]
    EmptyValues,

    /// Quantile outside `[0, 1]` or NaN.
    #[error("Invalid quantile at index {index}: {value}, quantiles should be in [0, 1]")]
    InvalidQuantile { index: usize, value: f64 },

    /// A value is NaN and cannot be ordered.
    #[error("Invalid value at index {index}: NaN cannot be sorted")]
    NanValue { index: usize },

    /// A weight is negative or non-finite.
    #[error("Invalid sample weight at index {index}: {value}, must be finite and non-negative")]
    InvalidWeight { index: usize, value: f64 },

    /// All weights are zero.
    #[error("Sample weights sum to zero")]
    ZeroTotalWeight,

    // ---- Shapes ----
    /// Two inputs that must have the same length do not.
    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },

    /// A zero-dimensional array cannot be indexed along axis 0.
    #[error("Array at position {position} is zero-dimensional and has no sample axis")]
    ZeroDimensional { position: usize },

    // ---- Theta sets ----
    /// A theta set has to be extended by cycling but is empty.
    #[error("Theta set {index} is empty and cannot be cycled to length {target}")]
    EmptyThetaSet { index: usize, target: usize },
}

#[cfg(feature = "python-bindings")]
impl From<ArrayError> for PyErr {
    fn from(err: ArrayError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Display messages embed the offending payload.
    fn display_includes_payload() {
        let msg = ArrayError::InvalidQuantile { index: 2, value: 1.5 }.to_string();
        assert!(msg.contains("index 2"));
        assert!(msg.contains("1.5"));

        let msg = ArrayError::LengthMismatch { what: "sample_weight", expected: 3, found: 4 }
            .to_string();
        assert!(msg.contains("sample_weight"));
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("found 4"));
    }
}
