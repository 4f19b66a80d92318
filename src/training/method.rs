//! Estimator variants and their loss sets.
//!
//! Purpose
//! -------
//! Map an estimator name to the weighted combination of loss terms it
//! trains on, and evaluate that combination on a batch.
//!
//! | method   | terms                          | weights     | labels                        |
//! |----------|--------------------------------|-------------|-------------------------------|
//! | `carl`   | xe                             | 1           | `xe`                          |
//! | `rolr`   | mse_r                          | 1           | `mse_r`                       |
//! | `cascal` | xe, mse_score                  | 1, α        | `xe`, `mse_score`             |
//! | `rascal` | mse_r, mse_score               | 1, α        | `mse_r`, `mse_score`          |
//! | `alice`  | augmented xe                   | 1           | `improved_xe`                 |
//! | `alices` | augmented xe, mse_score        | 1, α        | `improved_xe`, `mse_score`    |
//!
//! Invariants & assumptions
//! ------------------------
//! - Term order is fixed and the first term always has weight 1; α only
//!   scales the score term.
//! - α is finite and non-negative.

use std::{fmt, str::FromStr};

use crate::training::{
    errors::{TrainingError, TrainingResult},
    losses::{LossBatch, LossTerm},
};

/// Likelihood-free estimator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Carl,
    Rolr,
    Cascal,
    Rascal,
    Alice,
    Alices,
}

impl Method {
    pub const ALL: [Method; 6] =
        [Method::Carl, Method::Rolr, Method::Cascal, Method::Rascal, Method::Alice, Method::Alices];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Carl => "carl",
            Method::Rolr => "rolr",
            Method::Cascal => "cascal",
            Method::Rascal => "rascal",
            Method::Alice => "alice",
            Method::Alices => "alices",
        }
    }

    /// `true` if the method regresses on the joint score.
    pub fn uses_score(&self) -> bool {
        matches!(self, Method::Cascal | Method::Rascal | Method::Alices)
    }

    /// `true` if the method needs the joint likelihood ratio as a target.
    pub fn uses_ratio(&self) -> bool {
        !matches!(self, Method::Carl | Method::Cascal)
    }

    /// Weighted loss terms for this method, with score weight `alpha`.
    ///
    /// # Errors
    /// - [`TrainingError::InvalidAlpha`] unless `alpha` is finite and `>= 0`.
    pub fn loss_set(&self, alpha: f64) -> TrainingResult<LossSet> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(TrainingError::InvalidAlpha { value: alpha });
        }
        let terms = match self {
            Method::Carl => vec![(LossTerm::Xe, 1.0)],
            Method::Rolr => vec![(LossTerm::MseR, 1.0)],
            Method::Cascal => vec![(LossTerm::Xe, 1.0), (LossTerm::MseScore, alpha)],
            Method::Rascal => vec![(LossTerm::MseR, 1.0), (LossTerm::MseScore, alpha)],
            Method::Alice => vec![(LossTerm::AugmentedXe, 1.0)],
            Method::Alices => vec![(LossTerm::AugmentedXe, 1.0), (LossTerm::MseScore, alpha)],
        };
        Ok(LossSet {
            terms: terms.into_iter().map(|(term, weight)| WeightedLoss { term, weight }).collect(),
        })
    }
}

impl FromStr for Method {
    type Err = TrainingError;

    fn from_str(s: &str) -> TrainingResult<Self> {
        Method::ALL.into_iter().find(|m| m.name() == s).ok_or_else(|| TrainingError::UnknownMethod {
            name: s.to_string(),
            reason: "Valid options are 'carl', 'rolr', 'cascal', 'rascal', 'alice' or 'alices'.",
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One term of a [`LossSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLoss {
    pub term: LossTerm,
    pub weight: f64,
}

impl WeightedLoss {
    pub fn label(&self) -> &'static str {
        self.term.label()
    }
}

/// Ordered, weighted loss terms of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct LossSet {
    terms: Vec<WeightedLoss>,
}

impl LossSet {
    pub fn terms(&self) -> &[WeightedLoss] {
        &self.terms
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.terms.iter().map(WeightedLoss::label).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.weight).collect()
    }

    /// Evaluate every term and the weighted total on `batch`.
    pub fn evaluate(&self, batch: &LossBatch<'_>) -> TrainingResult<LossReport> {
        let mut total = 0.0;
        let mut components = Vec::with_capacity(self.terms.len());
        for t in &self.terms {
            let value = t.term.evaluate(batch)?;
            total += t.weight * value;
            components.push((t.label(), value));
        }
        Ok(LossReport { total, components })
    }
}

/// Outcome of [`LossSet::evaluate`]: unweighted per-term values by label,
/// plus the weighted sum.
#[derive(Debug, Clone, PartialEq)]
pub struct LossReport {
    pub total: f64,
    pub components: Vec<(&'static str, f64)>,
}

/// Loss set for the method called `method`.
///
/// # Errors
/// - [`TrainingError::UnknownMethod`] for names outside the table above.
/// - [`TrainingError::InvalidAlpha`] for a negative or non-finite `alpha`.
pub fn get_loss(method: &str, alpha: f64) -> TrainingResult<LossSet> {
    method.parse::<Method>()?.loss_set(alpha)
}
