//! training::losses: loss terms of the likelihood-free estimators.
//!
//! Purpose
//! -------
//! Evaluate the individual loss terms that the estimator variants combine:
//! cross-entropy of the classifier output, squared error of the estimated
//! likelihood ratio, squared error of the estimated score, and the
//! "improved" cross-entropy against the true ratio.
//!
//! Key behaviors
//! -------------
//! - [`LossBatch`] bundles the network outputs and targets of one batch and
//!   validates their shapes once.
//! - [`LossTerm::evaluate`] returns the batch-mean value of one term.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y_true` is 0 for events drawn from the numerator hypothesis and 1 for
//!   events from the denominator (reference) hypothesis.
//! - `s_hat` is a probability in `[0, 1]`; logarithms are clamped at `-100`
//!   so that saturated outputs give a large but finite loss.
//! - Ratios are clipped to `[e^-10, e^10]` before entering squared errors.
//!
//! Conventions
//! -----------
//! - Scores are `n × k` matrices, one row per event and one column per
//!   parameter of interest.
//! - All reductions are means over every element involved.

use ndarray::{ArrayView1, ArrayView2, Zip};

use crate::{
    numerics::s_from_r,
    training::errors::{TrainingError, TrainingResult},
};

/// Clip applied to log-ratios inside the ratio regression loss.
pub const LOSS_LOG_R_CLIP: f64 = 10.0;

/// Lower clamp of `ln(p)` in binary cross-entropy.
const LOG_FLOOR: f64 = -100.0;

/// Network outputs and targets of one batch.
#[derive(Debug, Clone)]
pub struct LossBatch<'a> {
    pub s_hat: ArrayView1<'a, f64>,
    pub log_r_hat: ArrayView1<'a, f64>,
    pub y_true: ArrayView1<'a, f64>,
    pub r_true: Option<ArrayView1<'a, f64>>,
    pub t_hat: Option<ArrayView2<'a, f64>>,
    pub t_true: Option<ArrayView2<'a, f64>>,
}

impl<'a> LossBatch<'a> {
    /// Batch with the always-present network outputs and labels.
    ///
    /// # Errors
    /// - [`TrainingError::EmptyBatch`] if there are no events.
    /// - [`TrainingError::ShapeMismatch`] if lengths differ.
    pub fn new(
        s_hat: ArrayView1<'a, f64>, log_r_hat: ArrayView1<'a, f64>, y_true: ArrayView1<'a, f64>,
    ) -> TrainingResult<Self> {
        let n = y_true.len();
        if n == 0 {
            return Err(TrainingError::EmptyBatch);
        }
        check_len("s_hat", n, s_hat.len())?;
        check_len("log_r_hat", n, log_r_hat.len())?;
        Ok(Self { s_hat, log_r_hat, y_true, r_true: None, t_hat: None, t_true: None })
    }

    /// Attach the true likelihood ratios.
    pub fn with_r_true(mut self, r_true: ArrayView1<'a, f64>) -> TrainingResult<Self> {
        check_len("r_true", self.len(), r_true.len())?;
        self.r_true = Some(r_true);
        Ok(self)
    }

    /// Attach estimated and true scores (`n × k` each).
    pub fn with_scores(
        mut self, t_hat: ArrayView2<'a, f64>, t_true: ArrayView2<'a, f64>,
    ) -> TrainingResult<Self> {
        check_len("t_hat rows", self.len(), t_hat.nrows())?;
        if t_hat.shape() != t_true.shape() {
            return Err(TrainingError::ShapeMismatch {
                what: "t_true",
                expected: t_hat.shape().to_vec(),
                found: t_true.shape().to_vec(),
            });
        }
        self.t_hat = Some(t_hat);
        self.t_true = Some(t_true);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> TrainingResult<()> {
    if expected != found {
        return Err(TrainingError::ShapeMismatch { what, expected: vec![expected], found: vec![found] });
    }
    Ok(())
}

/// A single loss term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossTerm {
    /// Cross-entropy of `s_hat` against the labels.
    Xe,
    /// Squared error of the ratio, numerator and denominator parts summed.
    MseR,
    /// Squared error of the score on numerator events.
    MseScore,
    /// Cross-entropy of `s_hat` against `s(r_true)`.
    AugmentedXe,
}

impl LossTerm {
    /// Label used when reporting this term.
    pub fn label(&self) -> &'static str {
        match self {
            LossTerm::Xe => "xe",
            LossTerm::MseR => "mse_r",
            LossTerm::MseScore => "mse_score",
            LossTerm::AugmentedXe => "improved_xe",
        }
    }

    /// Batch-mean value of this term.
    ///
    /// # Errors
    /// - [`TrainingError::MissingInput`] if the batch lacks `r_true` or the
    ///   scores this term needs.
    pub fn evaluate(&self, batch: &LossBatch<'_>) -> TrainingResult<f64> {
        match self {
            LossTerm::Xe => Ok(binary_cross_entropy(batch.s_hat, batch.y_true)),
            LossTerm::AugmentedXe => {
                let r_true = require(batch.r_true, self, "r_true")?;
                let s_true = r_true.mapv(s_from_r);
                Ok(binary_cross_entropy(batch.s_hat, s_true.view()))
            }
            LossTerm::MseR => {
                let r_true = require(batch.r_true, self, "r_true")?;
                Ok(ratio_mse(batch.log_r_hat, batch.y_true, r_true))
            }
            LossTerm::MseScore => {
                let t_hat = require(batch.t_hat, self, "t_hat")?;
                let t_true = require(batch.t_true, self, "t_true")?;
                Ok(score_mse(t_hat, t_true, batch.y_true))
            }
        }
    }
}

fn require<T>(input: Option<T>, term: &LossTerm, name: &'static str) -> TrainingResult<T> {
    input.ok_or(TrainingError::MissingInput { term: term.label(), input: name })
}

fn binary_cross_entropy(p: ArrayView1<'_, f64>, target: ArrayView1<'_, f64>) -> f64 {
    let n = p.len() as f64;
    let sum = Zip::from(&p).and(&target).fold(0.0, |acc, &p, &t| {
        let log_p = p.ln().max(LOG_FLOOR);
        let log_q = (1.0 - p).ln().max(LOG_FLOOR);
        acc - (t * log_p + (1.0 - t) * log_q)
    });
    sum / n
}

fn ratio_mse(
    log_r_hat: ArrayView1<'_, f64>, y_true: ArrayView1<'_, f64>, r_true: ArrayView1<'_, f64>,
) -> f64 {
    let r_min = (-LOSS_LOG_R_CLIP).exp();
    let r_max = LOSS_LOG_R_CLIP.exp();
    let n = y_true.len() as f64;

    let (num, den) = Zip::from(&log_r_hat).and(&y_true).and(&r_true).fold(
        (0.0, 0.0),
        |(num, den), &log_r_hat, &y, &r| {
            let r_hat = log_r_hat.clamp(-LOSS_LOG_R_CLIP, LOSS_LOG_R_CLIP).exp();
            let r = r.clamp(r_min, r_max);
            let num_diff = (1.0 - y) * (1.0 / r_hat - 1.0 / r);
            let den_diff = y * (r_hat - r);
            (num + num_diff * num_diff, den + den_diff * den_diff)
        },
    );
    num / n + den / n
}

fn score_mse(t_hat: ArrayView2<'_, f64>, t_true: ArrayView2<'_, f64>, y_true: ArrayView1<'_, f64>) -> f64 {
    let n_elems = t_hat.len();
    if n_elems == 0 {
        return 0.0;
    }
    let mut sum = 0.0;
    for ((row_hat, row_true), &y) in t_hat.rows().into_iter().zip(t_true.rows()).zip(y_true.iter()) {
        let mask = 1.0 - y;
        sum += Zip::from(&row_hat)
            .and(&row_true)
            .fold(0.0, |acc, &a, &b| acc + (mask * (a - b)).powi(2));
    }
    sum / n_elems as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Hand-computed values of each loss term on tiny batches.
    // - Masking: numerator-only terms ignore y = 1 events and vice versa.
    // - Saturation of cross-entropy and clipping of ratios.
    // - Batch validation and missing-input errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Xe is the mean binary cross-entropy against the labels.
    fn xe_matches_hand_computation() {
        let s_hat = array![0.8, 0.3];
        let log_r = array![0.0, 0.0];
        let y = array![1.0, 0.0];
        let batch = LossBatch::new(s_hat.view(), log_r.view(), y.view()).unwrap();

        let expected = -(0.8_f64.ln() + 0.7_f64.ln()) / 2.0;
        assert_relative_eq!(LossTerm::Xe.evaluate(&batch).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn xe_saturates_at_log_floor() {
        let s_hat = array![0.0];
        let log_r = array![0.0];
        let y = array![1.0];
        let batch = LossBatch::new(s_hat.view(), log_r.view(), y.view()).unwrap();
        assert_eq!(LossTerm::Xe.evaluate(&batch).unwrap(), 100.0);
    }

    #[test]
    // Purpose
    // -------
    // AugmentedXe uses s(r_true) = 1 / (1 + r_true) as a soft target; it is
    // minimised when s_hat equals that target.
    fn augmented_xe_targets_true_decision_function() {
        let r_true = array![1.0, 3.0];
        let s_true = array![0.5, 0.25];
        let log_r = array![0.0, 0.0];
        let y = array![0.0, 1.0];
        let at_truth = LossBatch::new(s_true.view(), log_r.view(), y.view())
            .unwrap()
            .with_r_true(r_true.view())
            .unwrap();
        let s_off = array![0.6, 0.2];
        let off_truth = LossBatch::new(s_off.view(), log_r.view(), y.view())
            .unwrap()
            .with_r_true(r_true.view())
            .unwrap();

        let best = LossTerm::AugmentedXe.evaluate(&at_truth).unwrap();
        let worse = LossTerm::AugmentedXe.evaluate(&off_truth).unwrap();
        let entropy = |s: f64| -(s * s.ln() + (1.0 - s) * (1.0 - s).ln());
        assert_relative_eq!(best, (entropy(0.5) + entropy(0.25)) / 2.0, epsilon = 1e-12);
        assert!(worse > best);
    }

    #[test]
    // Purpose
    // -------
    // MseR sums the numerator part (1/r on y = 0) and the denominator part
    // (r on y = 1), each averaged over the whole batch.
    //
    // Given
    // -----
    // - Event 0: y = 0, r_hat = e^0 = 1, r = 2 → (1 - 0.5)^2 = 0.25.
    // - Event 1: y = 1, r_hat = e^{ln 3} = 3, r = 1 → (3 - 1)^2 = 4.
    //
    // Expect
    // ------
    // - 0.25 / 2 + 4 / 2 = 2.125.
    fn mse_r_matches_hand_computation() {
        let s_hat = array![0.5, 0.5];
        let log_r = array![0.0, 3.0_f64.ln()];
        let y = array![0.0, 1.0];
        let r_true = array![2.0, 1.0];
        let batch = LossBatch::new(s_hat.view(), log_r.view(), y.view())
            .unwrap()
            .with_r_true(r_true.view())
            .unwrap();

        assert_relative_eq!(LossTerm::MseR.evaluate(&batch).unwrap(), 2.125, epsilon = 1e-12);
    }

    #[test]
    fn mse_r_clips_extreme_ratios() {
        let s_hat = array![0.5];
        let log_r = array![50.0];
        let y = array![1.0];
        let r_true = array![f64::INFINITY];
        let batch = LossBatch::new(s_hat.view(), log_r.view(), y.view())
            .unwrap()
            .with_r_true(r_true.view())
            .unwrap();
        // Both sides clip to e^10, so the loss vanishes instead of being NaN.
        assert_eq!(LossTerm::MseR.evaluate(&batch).unwrap(), 0.0);
    }

    #[test]
    // Score residuals of denominator events (y = 1) are masked out.
    fn mse_score_masks_denominator_events() {
        let s_hat = array![0.5, 0.5];
        let log_r = array![0.0, 0.0];
        let y = array![0.0, 1.0];
        let t_hat = array![[1.0, 2.0], [100.0, 100.0]];
        let t_true = array![[0.0, 0.0], [0.0, 0.0]];
        let batch = LossBatch::new(s_hat.view(), log_r.view(), y.view())
            .unwrap()
            .with_scores(t_hat.view(), t_true.view())
            .unwrap();

        // (1 + 4 + 0 + 0) / 4 elements.
        assert_relative_eq!(LossTerm::MseScore.evaluate(&batch).unwrap(), 1.25);
    }

    #[test]
    fn batch_validation_and_missing_inputs() {
        let a = array![0.5, 0.5];
        let b = array![0.5];
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(
            LossBatch::new(empty.view(), empty.view(), empty.view()).unwrap_err(),
            TrainingError::EmptyBatch
        );
        assert!(matches!(
            LossBatch::new(b.view(), a.view(), a.view()),
            Err(TrainingError::ShapeMismatch { what: "s_hat", .. })
        ));

        let batch = LossBatch::new(a.view(), a.view(), a.view()).unwrap();
        assert_eq!(
            LossTerm::MseR.evaluate(&batch),
            Err(TrainingError::MissingInput { term: "mse_r", input: "r_true" })
        );
        assert_eq!(
            LossTerm::MseScore.evaluate(&batch),
            Err(TrainingError::MissingInput { term: "mse_score", input: "t_hat" })
        );

        let t = array![[1.0], [2.0]];
        let t_wide = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(
            batch.clone().with_scores(t.view(), t_wide.view()),
            Err(TrainingError::ShapeMismatch { what: "t_true", .. })
        ));
    }
}
