//! Quantiles of weighted samples.
//!
//! Purpose
//! -------
//! Compute quantiles of a one-dimensional sample in which every entry carries
//! a non-negative weight, e.g. event weights from a simulator or importance
//! weights after reweighting.
//!
//! Key behaviors
//! -------------
//! - Each sorted value `x_i` with weight `w_i` is placed at the cumulative
//!   position `p_i = (Σ_{j≤i} w_j - w_i / 2) / Σ w` (midpoint rule), and
//!   requested quantiles are linearly interpolated between these knots.
//! - `old_style` rescales the knots so the first lies at 0 and the last at 1,
//!   which reproduces the classic unweighted percentile definition for unit
//!   weights.
//! - Outside the knot range the first / last value is returned; repeated
//!   knots (zero weights) resolve to the rightmost one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Quantiles lie in `[0, 1]`.
//! - Weights are finite, non-negative and not all zero.
//! - Values are not NaN (they have to be ordered); ±∞ are allowed.
//! - When `values_sorted` is set the caller guarantees ascending order; this
//!   is not re-checked.

use ndarray::{Array1, ArrayView1};

use crate::arrays::errors::{ArrayError, ArrayResult};

/// Sorting and normalisation switches for [`weighted_quantile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantileOptions {
    /// Skip sorting because `values` are already ascending.
    pub values_sorted: bool,
    /// Normalise knots to `[0, 1]` so unit weights match classic percentiles.
    pub old_style: bool,
}

/// Weighted quantiles of `values`.
///
/// # Parameters
/// - `values`: the sample.
/// - `quantiles`: requested quantile levels in `[0, 1]`.
/// - `sample_weight`: one weight per value, or `None` for unit weights.
/// - `opts`: see [`QuantileOptions`].
///
/// # Returns
/// One interpolated value per requested quantile, in request order.
///
/// # Errors
/// - [`ArrayError::EmptyValues`] if `values` is empty.
/// - [`ArrayError::LengthMismatch`] if weights and values differ in length.
/// - [`ArrayError::InvalidQuantile`] for levels outside `[0, 1]` or NaN.
/// - [`ArrayError::NanValue`] for NaN values.
/// - [`ArrayError::InvalidWeight`] / [`ArrayError::ZeroTotalWeight`] for bad weights.
pub fn weighted_quantile(
    values: ArrayView1<'_, f64>, quantiles: ArrayView1<'_, f64>,
    sample_weight: Option<ArrayView1<'_, f64>>, opts: QuantileOptions,
) -> ArrayResult<Array1<f64>> {
    let n = values.len();
    if n == 0 {
        return Err(ArrayError::EmptyValues);
    }
    for (index, &value) in quantiles.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(ArrayError::InvalidQuantile { index, value });
        }
    }
    if let Some(index) = values.iter().position(|v| v.is_nan()) {
        return Err(ArrayError::NanValue { index });
    }

    let weights: Vec<f64> = match sample_weight {
        Some(w) => {
            if w.len() != n {
                return Err(ArrayError::LengthMismatch {
                    what: "sample_weight",
                    expected: n,
                    found: w.len(),
                });
            }
            for (index, &value) in w.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ArrayError::InvalidWeight { index, value });
                }
            }
            w.to_vec()
        }
        None => vec![1.0; n],
    };

    let (sorted_values, sorted_weights) = if opts.values_sorted {
        (values.to_vec(), weights)
    } else {
        let mut order: Vec<usize> = (0..n).collect();
        // Stable sort keeps tied values in input order.
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let v = order.iter().map(|&i| values[i]).collect::<Vec<_>>();
        let w = order.iter().map(|&i| weights[i]).collect::<Vec<_>>();
        (v, w)
    };

    let total: f64 = sorted_weights.iter().sum();
    if total <= 0.0 {
        return Err(ArrayError::ZeroTotalWeight);
    }

    if n == 1 {
        return Ok(Array1::from_elem(quantiles.len(), sorted_values[0]));
    }

    let mut knots = Vec::with_capacity(n);
    let mut running = 0.0;
    for &w in &sorted_weights {
        running += w;
        knots.push(running - 0.5 * w);
    }

    if opts.old_style {
        let first = knots[0];
        for k in knots.iter_mut() {
            *k -= first;
        }
        let last = knots[n - 1];
        if last > 0.0 {
            for k in knots.iter_mut() {
                *k /= last;
            }
        }
    } else {
        for k in knots.iter_mut() {
            *k /= total;
        }
    }

    Ok(quantiles.mapv(|q| interp(q, &knots, &sorted_values)))
}

/// Piecewise-linear interpolation with constant extrapolation.
///
/// `xp` must be non-decreasing and the same length as `fp` (≥ 1).
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x < xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }
    // Index of the last knot with xp[j] <= x; guaranteed < last here.
    let j = xp.partition_point(|&k| k <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    if x == x0 {
        return y0;
    }
    let slope = (y1 - y0) / (x1 - x0);
    let mut res = slope * (x - x0) + y0;
    // Infinite values: retry from the right knot, then fall back to a
    // shared infinite value.
    if res.is_nan() {
        res = slope * (x - x1) + y1;
        if res.is_nan() && y0 == y1 {
            res = y0;
        }
    }
    res
}
