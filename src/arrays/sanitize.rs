//! arrays::sanitize: in-place replacement of non-finite entries and clipping.
//!
//! Purpose
//! -------
//! Clean arrays produced by simulators or networks before they enter loss
//! functions or summary statistics: NaN and ±∞ entries are replaced by
//! configurable constants and the result is optionally clipped.
//!
//! Key behaviors
//! -------------
//! - Replacement happens in three sequential passes: `-∞`, then any `±∞`,
//!   then `NaN`, followed by clipping to `[min_value, max_value]`. A
//!   non-finite replacement value feeds into the later passes, so a `-∞`
//!   replaced by `+∞` ends up as `replace_inf`, and an infinity replaced by
//!   NaN ends up as `replace_nan`.
//! - The operation is in place on any dimensionality; [`sanitized`] is the
//!   copying counterpart.
//! - A [`SanitizeReport`] counts what was touched, so callers can log or
//!   assert on data quality.
//!
//! Invariants & assumptions
//! ------------------------
//! - Clipping bounds are never NaN and satisfy `min_value <= max_value`
//!   when both are present (enforced by [`SanitizeOptions::new`]).
//! - Report counts refer to the original value of each entry, whatever
//!   passes it went through afterwards.

use ndarray::{Array, ArrayBase, Data, DataMut, Dimension};

use crate::arrays::errors::{ArrayError, ArrayResult};

/// Replacement values and optional clipping bounds for [`sanitize_array`].
///
/// Default: every replacement is `0.0` and no clipping is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SanitizeOptions {
    pub replace_nan: f64,
    pub replace_inf: f64,
    pub replace_neg_inf: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl SanitizeOptions {
    /// Build validated options.
    ///
    /// # Errors
    /// - [`ArrayError::NanBound`] if a bound is NaN.
    /// - [`ArrayError::InvertedBounds`] if `min_value > max_value`.
    pub fn new(
        replace_nan: f64, replace_inf: f64, replace_neg_inf: f64, min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> ArrayResult<Self> {
        if min_value.is_some_and(f64::is_nan) {
            return Err(ArrayError::NanBound { name: "min_value" });
        }
        if max_value.is_some_and(f64::is_nan) {
            return Err(ArrayError::NanBound { name: "max_value" });
        }
        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(ArrayError::InvertedBounds { min, max });
            }
        }
        Ok(Self { replace_nan, replace_inf, replace_neg_inf, min_value, max_value })
    }

    /// Options that only clip, with the default zero replacements.
    pub fn clip(min_value: Option<f64>, max_value: Option<f64>) -> ArrayResult<Self> {
        Self::new(0.0, 0.0, 0.0, min_value, max_value)
    }

    fn clips(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            replace_nan: 0.0,
            replace_inf: 0.0,
            replace_neg_inf: 0.0,
            min_value: None,
            max_value: None,
        }
    }
}

/// Counts of entries touched by [`sanitize_array`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub n_nan: usize,
    pub n_pos_inf: usize,
    pub n_neg_inf: usize,
    pub n_clipped: usize,
}

impl SanitizeReport {
    /// Number of non-finite entries that were replaced.
    pub fn n_replaced(&self) -> usize {
        self.n_nan + self.n_pos_inf + self.n_neg_inf
    }

    /// `true` if the array was left untouched.
    pub fn is_clean(&self) -> bool {
        self.n_replaced() == 0 && self.n_clipped == 0
    }
}

/// Replace non-finite entries and clip, in place.
///
/// Clipping is applied after replacement, so replacement values outside the
/// bounds are clipped too (and counted in `n_clipped`).
pub fn sanitize_array<S, D>(array: &mut ArrayBase<S, D>, opts: &SanitizeOptions) -> SanitizeReport
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    let mut report = SanitizeReport::default();
    let clips = opts.clips();
    let lo = opts.min_value.unwrap_or(f64::NEG_INFINITY);
    let hi = opts.max_value.unwrap_or(f64::INFINITY);

    array.map_inplace(|v| {
        if *v == f64::NEG_INFINITY {
            report.n_neg_inf += 1;
        } else if *v == f64::INFINITY {
            report.n_pos_inf += 1;
        } else if v.is_nan() {
            report.n_nan += 1;
        }

        if *v == f64::NEG_INFINITY {
            *v = opts.replace_neg_inf;
        }
        if v.is_infinite() {
            *v = opts.replace_inf;
        }
        if v.is_nan() {
            *v = opts.replace_nan;
        }

        if clips && !v.is_nan() {
            let clipped = v.clamp(lo, hi);
            if clipped != *v {
                *v = clipped;
                report.n_clipped += 1;
            }
        }
    });

    report
}

/// Copying variant of [`sanitize_array`].
pub fn sanitized<S, D>(array: &ArrayBase<S, D>, opts: &SanitizeOptions) -> (Array<f64, D>, SanitizeReport)
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = array.to_owned();
    let report = sanitize_array(&mut out, opts);
    (out, report)
}
