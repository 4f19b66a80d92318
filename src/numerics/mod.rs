//! numerics: small numeric transforms shared across the inference pipeline.
//!
//! Purpose
//! -------
//! Collect the scalar and element-wise helpers that map between classifier
//! outputs `s`, likelihood ratios `r`, log-ratios and scores, together with
//! the default clipping constants used when cleaning network outputs.
//!
//! Key behaviors
//! -------------
//! - Stable logistic function (`sigmoid`) for scalars and arrays.
//! - Odds transforms `s_from_r` / `r_from_s` with the usual clipping.
//! - Cleaning of estimated log-ratios (`clean_log_r`) and scores
//!   (`clean_t`) before they are handed to downstream statistics.
//!
//! Invariants & assumptions
//! ------------------------
//! - All routines are pure and never panic; NaN follows IEEE semantics
//!   except where a function explicitly defines a replacement.
//! - Array variants accept any dimensionality and return owned arrays of the
//!   same shape.
//!
//! Conventions
//! -----------
//! - This module never logs or performs I/O.
//! - Default constants (`DEFAULT_R_EPS`, `DEFAULT_LOG_R_CLIP`,
//!   `DEFAULT_T_CLIP`, `DEFAULT_APPROX_EPS`) live here so that the loss and
//!   training layers share the same numbers.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas,
//!   boundary clipping and NaN replacement.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    DEFAULT_APPROX_EPS, DEFAULT_LOG_R_CLIP, DEFAULT_R_EPS, DEFAULT_T_CLIP, approx_equal,
    clean_log_r, clean_t, r_from_s, r_from_s_array, s_from_r, s_from_r_array, sigmoid,
    sigmoid_array,
};

pub mod prelude {
    pub use super::transformations::{
        DEFAULT_LOG_R_CLIP, DEFAULT_R_EPS, DEFAULT_T_CLIP, approx_equal, clean_log_r, clean_t,
        r_from_s, s_from_r, sigmoid,
    };
}
