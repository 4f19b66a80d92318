//! Scalar and element-wise transforms between classifier outputs, likelihood
//! ratios and scores.
//!
//! The functions here follow guarded strategies similar to those in major ML
//! libraries, branching on the sign of the argument so that `f64` arithmetic
//! stays in a well-conditioned regime.
//!
//! # Provided items
//! - [`sigmoid`] / [`sigmoid_array`]: logistic function `1 / (1 + exp(-x))`.
//! - [`s_from_r`] / [`s_from_r_array`]: decision function `s = 1 / (1 + r)`,
//!   clipped to `[0, 1]`.
//! - [`r_from_s`] / [`r_from_s_array`]: regularized inverse
//!   `r = (1 - s + ε) / (s + ε)`, bounded below by `ε`.
//! - [`clean_log_r`]: NaN → `-clip`, otherwise clip into `[-clip, clip]`.
//! - [`clean_t`]: NaN → `0`, otherwise clip into `[-clip, clip]`.
//! - [`approx_equal`]: strict absolute-difference comparison.
use ndarray::{Array, ArrayBase, Data, Dimension};

/// Default regularizer `ε` used by [`r_from_s`].
pub const DEFAULT_R_EPS: f64 = 1.0e-6;

/// Default symmetric clip applied by [`clean_log_r`].
pub const DEFAULT_LOG_R_CLIP: f64 = 20.0;

/// Default symmetric clip applied by [`clean_t`].
pub const DEFAULT_T_CLIP: f64 = 1000.0;

/// Default tolerance for [`approx_equal`].
pub const DEFAULT_APPROX_EPS: f64 = 1.0e-6;

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// For `x ≥ 0` the textbook form is safe. For negative `x` the equivalent
/// `exp(x) / (1 + exp(x))` is used so that `exp(-x)` never overflows.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Element-wise [`sigmoid`].
pub fn sigmoid_array<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(sigmoid)
}

/// Decision function `s(r) = 1 / (1 + r)` clipped to `[0, 1]`.
///
/// A ratio of `+∞` maps to `0`; negative ratios (which are not valid
/// likelihood ratios) are clipped rather than rejected. NaN passes through.
pub fn s_from_r(r: f64) -> f64 {
    let s = 1.0 / (1.0 + r);
    if s.is_nan() { s } else { s.clamp(0.0, 1.0) }
}

/// Element-wise [`s_from_r`].
pub fn s_from_r_array<S, D>(r: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    r.mapv(s_from_r)
}

/// Regularized inverse of [`s_from_r`]: `r(s) = (1 - s + ε) / (s + ε)`.
///
/// Only the lower bound `ε` is enforced; there is no upper clip.
pub fn r_from_s(s: f64, epsilon: f64) -> f64 {
    let r = (1.0 - s + epsilon) / (s + epsilon);
    if r < epsilon { epsilon } else { r }
}

/// Element-wise [`r_from_s`].
pub fn r_from_s_array<S, D>(s: &ArrayBase<S, D>, epsilon: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    s.mapv(|v| r_from_s(v, epsilon))
}

/// Replace NaN log-ratios by `-log_r_clip` and clip everything else into
/// `[-log_r_clip, log_r_clip]`.
pub fn clean_log_r<S, D>(log_r: &ArrayBase<S, D>, log_r_clip: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    log_r.mapv(|v| if v.is_nan() { -log_r_clip } else { v.clamp(-log_r_clip, log_r_clip) })
}

/// Replace NaN scores by `0` and clip everything else into `[-t_clip, t_clip]`.
pub fn clean_t<S, D>(t: &ArrayBase<S, D>, t_clip: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    t.mapv(|v| if v.is_nan() { 0.0 } else { v.clamp(-t_clip, t_clip) })
}

/// `|a - b| < epsilon`.
pub fn approx_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Agreement of the guarded sigmoid with the naïve formula on a safe
    //   grid, and finite saturation in the tails.
    // - s ↔ r round trips away from the boundaries and the clipping rules at
    //   the boundaries.
    // - NaN / ±∞ handling of clean_log_r and clean_t.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The stable sigmoid must agree with 1 / (1 + exp(-x)) where the naïve
    // form is well conditioned and saturate cleanly in the tails.
    fn sigmoid_matches_naive_and_saturates() {
        for &x in &[-30.0_f64, -5.0, -0.3, 0.0, 0.7, 4.0, 30.0] {
            let naive = 1.0 / (1.0 + (-x).exp());
            assert_relative_eq!(sigmoid(x), naive, epsilon = 1e-14);
        }
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid(1.0e4), 1.0);
        assert_eq!(sigmoid(-1.0e4), 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn sigmoid_is_antisymmetric_around_one_half() {
        for &x in &[0.1, 1.0, 3.5, 12.0] {
            assert_relative_eq!(sigmoid(x) + sigmoid(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // s_from_r and r_from_s are inverses up to the ε regularizer.
    //
    // Given
    // -----
    // - Ratios in (0.01, 100).
    //
    // Expect
    // ------
    // - r_from_s(s_from_r(r)) ≈ r within a few ε.
    fn s_and_r_round_trip_away_from_boundaries() {
        for &r in &[0.01, 0.5, 1.0, 2.0, 100.0] {
            let s = s_from_r(r);
            assert_relative_eq!(r_from_s(s, DEFAULT_R_EPS), r, max_relative = 1e-3);
        }
    }

    #[test]
    fn s_from_r_clips_into_unit_interval() {
        assert_eq!(s_from_r(0.0), 1.0);
        assert_eq!(s_from_r(f64::INFINITY), 0.0);
        // r in (-1, 0) would give s > 1 without clipping.
        assert_eq!(s_from_r(-0.5), 1.0);
        // r < -1 gives a negative s.
        assert_eq!(s_from_r(-3.0), 0.0);
        assert!(s_from_r(f64::NAN).is_nan());
    }

    #[test]
    fn r_from_s_respects_lower_bound() {
        // s = 1 gives ε / (1 + ε) < ε, which is clipped up to ε.
        assert_eq!(r_from_s(1.0, 1e-6), 1e-6);
        assert_relative_eq!(r_from_s(0.0, 1e-6), (1.0 + 1e-6) / 1e-6);
        let s = array![0.25, 0.5];
        let r = r_from_s_array(&s, 0.0);
        assert_relative_eq!(r[0], 3.0);
        assert_relative_eq!(r[1], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // clean_log_r maps NaN to the negative clip (ratio ≈ 0) and clips ±∞.
    fn clean_log_r_replaces_nan_and_clips() {
        let log_r = array![f64::NAN, -50.0, 3.0, f64::INFINITY, f64::NEG_INFINITY];
        let cleaned = clean_log_r(&log_r, DEFAULT_LOG_R_CLIP);
        assert_eq!(cleaned, array![-20.0, -20.0, 3.0, 20.0, -20.0]);
    }

    #[test]
    fn clean_t_replaces_nan_with_zero_and_clips() {
        let t = array![[f64::NAN, 2000.0], [-5.0, f64::NEG_INFINITY]];
        let cleaned = clean_t(&t, DEFAULT_T_CLIP);
        assert_eq!(cleaned, array![[0.0, 1000.0], [-5.0, -1000.0]]);
    }

    #[test]
    fn approx_equal_is_strict() {
        assert!(approx_equal(1.0, 1.0 + 5e-7, DEFAULT_APPROX_EPS));
        assert!(!approx_equal(1.0, 1.5, 0.5));
        assert!(!approx_equal(f64::NAN, f64::NAN, 1.0));
    }
}
