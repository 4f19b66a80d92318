//! training::options: validated run configuration built from names.
//!
//! Purpose
//! -------
//! Collect the choices a training run is parameterised by (estimator
//! method, score weight α, optimizer, learning rate, activation) into one
//! value that has been parsed and validated up front, so a typo in a name
//! fails before any data are loaded.
//!
//! Conventions
//! -----------
//! - String choices go through the same parsers as the individual lookups
//!   (`Method::from_str`, `get_optimizer`, `Activation::from_str`).
//! - Defaults: `carl`, `α = 1`, `amsgrad`, learning rate `1e-3`, `tanh`.

use crate::training::{
    activation::Activation,
    errors::{TrainingError, TrainingResult},
    losses::LossBatch,
    method::{LossReport, LossSet, Method},
    optimizer::{Optimizer, OptimizerConfig, get_optimizer},
};

/// Default learning rate.
pub const DEFAULT_LEARNING_RATE: f64 = 1.0e-3;

/// Default score-loss weight.
pub const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOptions {
    pub method: Method,
    pub alpha: f64,
    pub optimizer: OptimizerConfig,
    pub learning_rate: f64,
    pub activation: Activation,
}

impl TrainerOptions {
    /// Build options from typed values.
    ///
    /// # Errors
    /// - [`TrainingError::InvalidAlpha`] / [`TrainingError::InvalidLearningRate`].
    pub fn new(
        method: Method, alpha: f64, optimizer: OptimizerConfig, learning_rate: f64,
        activation: Activation,
    ) -> TrainingResult<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(TrainingError::InvalidAlpha { value: alpha });
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(TrainingError::InvalidLearningRate { value: learning_rate });
        }
        Ok(Self { method, alpha, optimizer, learning_rate, activation })
    }

    /// Build options from names, e.g. `("alices", 10.0, "sgd", Some(0.9), 1e-3, "relu")`.
    ///
    /// # Errors
    /// - Any lookup error for unknown names, plus the numeric checks of [`Self::new`].
    pub fn from_names(
        method: &str, alpha: f64, optimizer: &str, nesterov_momentum: Option<f64>,
        learning_rate: f64, activation: &str,
    ) -> TrainingResult<Self> {
        let method = method.parse::<Method>()?;
        let optimizer = get_optimizer(optimizer, nesterov_momentum)?;
        let activation = activation.parse::<Activation>()?;
        Self::new(method, alpha, optimizer, learning_rate, activation)
    }

    pub fn loss_set(&self) -> TrainingResult<LossSet> {
        self.method.loss_set(self.alpha)
    }

    pub fn build_optimizer(&self) -> TrainingResult<Box<dyn Optimizer>> {
        self.optimizer.build(self.learning_rate)
    }

    /// Weighted loss of `batch` under the configured method.
    pub fn evaluate(&self, batch: &LossBatch<'_>) -> TrainingResult<LossReport> {
        self.loss_set()?.evaluate(batch)
    }
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            method: Method::Carl,
            alpha: DEFAULT_ALPHA,
            optimizer: OptimizerConfig::Adam { amsgrad: true },
            learning_rate: DEFAULT_LEARNING_RATE,
            activation: Activation::Tanh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_parses_every_choice() {
        let opts = TrainerOptions::from_names("rascal", 5.0, "sgd", Some(0.8), 0.01, "relu").unwrap();
        assert_eq!(opts.method, Method::Rascal);
        assert_eq!(opts.optimizer, OptimizerConfig::Sgd { momentum: Some(0.8), nesterov: true });
        assert_eq!(opts.activation, Activation::Relu);
        assert_eq!(opts.loss_set().unwrap().weights(), vec![1.0, 5.0]);
        assert_eq!(opts.build_optimizer().unwrap().learning_rate(), 0.01);
    }

    #[test]
    fn from_names_surfaces_the_first_bad_choice() {
        assert!(matches!(
            TrainerOptions::from_names("carl", 1.0, "adagrad", None, 0.01, "relu"),
            Err(TrainingError::UnknownOptimizer { .. })
        ));
        assert!(matches!(
            TrainerOptions::from_names("carl", 1.0, "adam", None, 0.01, "gelu"),
            Err(TrainingError::UnknownActivation { .. })
        ));
        assert_eq!(
            TrainerOptions::from_names("carl", 1.0, "adam", None, -1.0, "relu"),
            Err(TrainingError::InvalidLearningRate { value: -1.0 })
        );
    }

    #[test]
    fn default_is_valid() {
        let d = TrainerOptions::default();
        let rebuilt = TrainerOptions::new(d.method, d.alpha, d.optimizer, d.learning_rate, d.activation);
        assert_eq!(rebuilt, Ok(d));
    }
}
