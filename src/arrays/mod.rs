//! arrays: cleaning, summarising and resampling sample arrays.
//!
//! Purpose
//! -------
//! Group the array-level helpers used while preparing training and
//! evaluation samples: replacement of non-finite entries, weighted
//! quantiles of event samples, and joint reordering / subsampling of
//! parallel arrays.
//!
//! Key behaviors
//! -------------
//! - [`sanitize`]: in-place NaN / ±∞ replacement followed by optional
//!   clipping, with a report of what changed.
//! - [`quantile`]: weighted quantiles with midpoint knots and linear
//!   interpolation.
//! - [`resample`]: shuffle, truncate and bootstrap several arrays with a
//!   single shared index set; cycle theta-set lists to equal length.
//!
//! Conventions
//! -----------
//! - Axis 0 is always the event axis.
//! - Fallible routines return [`ArrayResult`]; nothing in this module panics
//!   on user input.
//! - No logging; callers decide what to report.

pub mod errors;
pub mod quantile;
pub mod resample;
pub mod sanitize;

pub use self::errors::{ArrayError, ArrayResult};
pub use self::quantile::{QuantileOptions, weighted_quantile};
pub use self::resample::{
    Permutation, balance_thetas, bootstrap, restrict_samplesize, shuffle, shuffle_default,
};
pub use self::sanitize::{SanitizeOptions, SanitizeReport, sanitize_array, sanitized};

pub mod prelude {
    pub use super::errors::{ArrayError, ArrayResult};
    pub use super::quantile::{QuantileOptions, weighted_quantile};
    pub use super::resample::{balance_thetas, restrict_samplesize, shuffle};
    pub use super::sanitize::{SanitizeOptions, sanitize_array};
}
