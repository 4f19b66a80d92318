//! training: name-based selection of losses, optimizers and activations.
//!
//! Purpose
//! -------
//! Provide the pieces a training loop for the likelihood-free estimators
//! (carl, rolr, cascal, rascal, alice, alices) selects by name: the weighted
//! loss set of a method, a first-order optimizer, and the activation
//! function, together with NaN checks on parameters.
//!
//! Key behaviors
//! -------------
//! - [`get_loss`] / [`Method::loss_set`]: method name → ordered weighted
//!   loss terms with stable labels.
//! - [`LossTerm::evaluate`] / [`LossSet::evaluate`]: batch-mean loss values
//!   on `ndarray` views.
//! - [`get_optimizer`]: optimizer name (+ optional Nesterov momentum) →
//!   [`OptimizerConfig`], buildable into an [`Optimizer`].
//! - [`Activation`]: `relu` / `tanh` / `sigmoid`.
//! - [`check_for_nans_in_parameters`]: early stop signal for diverging runs.
//! - [`TrainerOptions`]: everything above, parsed and validated together.
//!
//! Invariants & assumptions
//! ------------------------
//! - Name lookups are exact for methods and optimizers and
//!   case-insensitive for activations.
//! - Errors are reported as [`TrainingError`]; nothing here panics on user
//!   input.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests with hand-computed values; the
//!   integration test under `tests/` runs a loss-and-step cycle on loaded
//!   data.

pub mod activation;
pub mod diagnostics;
pub mod errors;
pub mod losses;
pub mod method;
pub mod optimizer;
pub mod options;

pub use self::activation::Activation;
pub use self::diagnostics::{ParamView, check_for_nans_in_parameters};
pub use self::errors::{TrainingError, TrainingResult};
pub use self::losses::{LOSS_LOG_R_CLIP, LossBatch, LossTerm};
pub use self::method::{LossReport, LossSet, Method, WeightedLoss, get_loss};
pub use self::optimizer::{Adam, Optimizer, OptimizerConfig, Sgd, get_optimizer};
pub use self::options::TrainerOptions;

pub mod prelude {
    pub use super::activation::Activation;
    pub use super::errors::{TrainingError, TrainingResult};
    pub use super::losses::{LossBatch, LossTerm};
    pub use super::method::{LossSet, Method, get_loss};
    pub use super::optimizer::{Optimizer, OptimizerConfig, get_optimizer};
    pub use super::options::TrainerOptions;
}
