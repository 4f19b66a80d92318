//! training::optimizer: first-order optimizers selectable by name.
//!
//! Purpose
//! -------
//! Resolve an optimizer name into an [`OptimizerConfig`] and build a stateful
//! [`Optimizer`] that updates a flat parameter vector from its gradient.
//!
//! Key behaviors
//! -------------
//! - `"adam"` → Adam; `"amsgrad"` → Adam with the AMSGrad running maximum;
//!   `"sgd"` → plain SGD, or SGD with Nesterov momentum when a momentum is
//!   supplied.
//! - Update rules follow the common deep-learning formulation: bias-corrected
//!   Adam moments with `β = (0.9, 0.999)` and `ε = 1e-8`; SGD momentum buffers
//!   initialised with the first gradient and no dampening.
//!
//! Invariants & assumptions
//! ------------------------
//! - Learning rate is finite and `> 0`; momentum is finite and in `[0, 1)`.
//! - An optimizer instance is bound to one parameter length, fixed by its
//!   first step.

use std::{fmt, str::FromStr};

use ndarray::{Array1, ArrayView1, ArrayViewMut1, Zip};

use crate::training::errors::{TrainingError, TrainingResult};

/// Adam first-moment decay.
pub const ADAM_BETA1: f64 = 0.9;
/// Adam second-moment decay.
pub const ADAM_BETA2: f64 = 0.999;
/// Adam denominator regulariser.
pub const ADAM_EPS: f64 = 1.0e-8;

/// Optimizer family and its options, as selected by [`get_optimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizerConfig {
    Adam { amsgrad: bool },
    Sgd { momentum: Option<f64>, nesterov: bool },
}

impl OptimizerConfig {
    /// Instantiate the optimizer with learning rate `learning_rate`.
    ///
    /// # Errors
    /// - [`TrainingError::InvalidLearningRate`] / [`TrainingError::InvalidMomentum`].
    pub fn build(&self, learning_rate: f64) -> TrainingResult<Box<dyn Optimizer>> {
        Ok(match *self {
            OptimizerConfig::Adam { amsgrad } => Box::new(Adam::new(learning_rate, amsgrad)?),
            OptimizerConfig::Sgd { momentum, nesterov } => {
                Box::new(Sgd::new(learning_rate, momentum, nesterov)?)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Adam { amsgrad: false } => "adam",
            OptimizerConfig::Adam { amsgrad: true } => "amsgrad",
            OptimizerConfig::Sgd { .. } => "sgd",
        }
    }
}

impl fmt::Display for OptimizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optimizer configuration for `name`.
///
/// `nesterov_momentum` only matters for `"sgd"`: when present it enables
/// Nesterov momentum with that coefficient.
///
/// # Errors
/// - [`TrainingError::UnknownOptimizer`] for names other than `adam`,
///   `amsgrad` and `sgd`.
/// - [`TrainingError::InvalidMomentum`] for a momentum outside `[0, 1)`.
pub fn get_optimizer(name: &str, nesterov_momentum: Option<f64>) -> TrainingResult<OptimizerConfig> {
    match name {
        "adam" => Ok(OptimizerConfig::Adam { amsgrad: false }),
        "amsgrad" => Ok(OptimizerConfig::Adam { amsgrad: true }),
        "sgd" => match nesterov_momentum {
            Some(m) => {
                validate_momentum(m)?;
                Ok(OptimizerConfig::Sgd { momentum: Some(m), nesterov: true })
            }
            None => Ok(OptimizerConfig::Sgd { momentum: None, nesterov: false }),
        },
        other => Err(TrainingError::UnknownOptimizer {
            name: other.to_string(),
            reason: "Valid options are 'adam', 'amsgrad' or 'sgd'.",
        }),
    }
}

impl FromStr for OptimizerConfig {
    type Err = TrainingError;

    /// Parse without momentum; see [`get_optimizer`] for SGD with momentum.
    fn from_str(s: &str) -> TrainingResult<Self> {
        get_optimizer(s, None)
    }
}

fn validate_learning_rate(lr: f64) -> TrainingResult<()> {
    if !lr.is_finite() || lr <= 0.0 {
        return Err(TrainingError::InvalidLearningRate { value: lr });
    }
    Ok(())
}

fn validate_momentum(m: f64) -> TrainingResult<()> {
    if !m.is_finite() || !(0.0..1.0).contains(&m) {
        return Err(TrainingError::InvalidMomentum { value: m });
    }
    Ok(())
}

fn check_step_shapes(
    state_len: Option<usize>, params: &ArrayViewMut1<'_, f64>, grad: &ArrayView1<'_, f64>,
) -> TrainingResult<()> {
    if params.len() != grad.len() {
        return Err(TrainingError::ShapeMismatch {
            what: "gradient",
            expected: vec![params.len()],
            found: vec![grad.len()],
        });
    }
    if let Some(n) = state_len {
        if n != params.len() {
            return Err(TrainingError::ShapeMismatch {
                what: "parameters",
                expected: vec![n],
                found: vec![params.len()],
            });
        }
    }
    Ok(())
}

/// Gradient-descent optimizer updating parameters in place.
pub trait Optimizer {
    /// Apply one update `params ← params - Δ(grad)`.
    fn step(&mut self, params: ArrayViewMut1<'_, f64>, grad: ArrayView1<'_, f64>) -> TrainingResult<()>;

    /// Number of steps taken so far.
    fn steps(&self) -> u64;

    fn learning_rate(&self) -> f64;
}

/// Adam / AMSGrad.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f64,
    amsgrad: bool,
    t: u64,
    m: Option<Array1<f64>>,
    v: Option<Array1<f64>>,
    v_max: Option<Array1<f64>>,
}

impl Adam {
    pub fn new(learning_rate: f64, amsgrad: bool) -> TrainingResult<Self> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { lr: learning_rate, amsgrad, t: 0, m: None, v: None, v_max: None })
    }
}

impl Optimizer for Adam {
    fn step(&mut self, mut params: ArrayViewMut1<'_, f64>, grad: ArrayView1<'_, f64>) -> TrainingResult<()> {
        check_step_shapes(self.m.as_ref().map(Array1::len), &params, &grad)?;
        let n = params.len();
        let m = self.m.get_or_insert_with(|| Array1::zeros(n));
        let v = self.v.get_or_insert_with(|| Array1::zeros(n));

        self.t += 1;
        let bias1 = 1.0 - ADAM_BETA1.powf(self.t as f64);
        let bias2 = 1.0 - ADAM_BETA2.powf(self.t as f64);

        Zip::from(&mut *m).and(&mut *v).and(&grad).for_each(|m, v, &g| {
            *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
            *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;
        });

        if self.amsgrad {
            let v_max = self.v_max.get_or_insert_with(|| Array1::zeros(n));
            Zip::from(v_max).and(&*v).for_each(|vm, &v| *vm = vm.max(v));
        }
        let second: &Array1<f64> = match self.v_max.as_ref() {
            Some(v_max) if self.amsgrad => v_max,
            _ => v,
        };

        let lr = self.lr;
        Zip::from(&mut params).and(&*m).and(second).for_each(|p, &m, &v| {
            let m_hat = m / bias1;
            let v_hat = v / bias2;
            *p -= lr * m_hat / (v_hat.sqrt() + ADAM_EPS);
        });
        Ok(())
    }

    fn steps(&self) -> u64 {
        self.t
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }
}

/// Stochastic gradient descent with optional (Nesterov) momentum.
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: f64,
    momentum: f64,
    nesterov: bool,
    t: u64,
    buffer: Option<Array1<f64>>,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: Option<f64>, nesterov: bool) -> TrainingResult<Self> {
        validate_learning_rate(learning_rate)?;
        let momentum = momentum.unwrap_or(0.0);
        validate_momentum(momentum)?;
        Ok(Self { lr: learning_rate, momentum, nesterov, t: 0, buffer: None })
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, mut params: ArrayViewMut1<'_, f64>, grad: ArrayView1<'_, f64>) -> TrainingResult<()> {
        check_step_shapes(self.buffer.as_ref().map(Array1::len), &params, &grad)?;
        self.t += 1;
        let lr = self.lr;

        if self.momentum == 0.0 {
            params.scaled_add(-lr, &grad);
            return Ok(());
        }

        let mu = self.momentum;
        let buf = match self.buffer.take() {
            None => grad.to_owned(),
            Some(mut buf) => {
                Zip::from(&mut buf).and(&grad).for_each(|b, &g| *b = mu * *b + g);
                buf
            }
        };
        let buf = &*self.buffer.insert(buf);

        if self.nesterov {
            Zip::from(&mut params).and(&grad).and(buf).for_each(|p, &g, &b| *p -= lr * (g + mu * b));
        } else {
            params.scaled_add(-lr, buf);
        }
        Ok(())
    }

    fn steps(&self) -> u64 {
        self.t
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Name lookup and option mapping of get_optimizer.
    // - Hand-computed first steps of Adam and SGD variants.
    // - Convergence on a convex quadratic for every configuration.
    // - Validation of learning rate, momentum and shapes.
    // -------------------------------------------------------------------------

    #[test]
    fn names_map_to_configs() {
        assert_eq!(get_optimizer("adam", None).unwrap(), OptimizerConfig::Adam { amsgrad: false });
        assert_eq!(get_optimizer("amsgrad", Some(0.9)).unwrap(), OptimizerConfig::Adam { amsgrad: true });
        assert_eq!(
            get_optimizer("sgd", None).unwrap(),
            OptimizerConfig::Sgd { momentum: None, nesterov: false }
        );
        assert_eq!(
            get_optimizer("sgd", Some(0.9)).unwrap(),
            OptimizerConfig::Sgd { momentum: Some(0.9), nesterov: true }
        );
        assert!(matches!(
            get_optimizer("rmsprop", None),
            Err(TrainingError::UnknownOptimizer { ref name, .. }) if name == "rmsprop"
        ));
        assert_eq!(get_optimizer("sgd", Some(1.0)), Err(TrainingError::InvalidMomentum { value: 1.0 }));
        assert_eq!("amsgrad".parse::<OptimizerConfig>().unwrap().to_string(), "amsgrad");
    }

    #[test]
    // Purpose
    // -------
    // The first Adam step moves each coordinate by ≈ lr against the sign of
    // the gradient, since m̂ / √v̂ = g / |g| after bias correction.
    fn adam_first_step_is_sign_scaled() {
        let mut opt = Adam::new(0.1, false).unwrap();
        let mut p = array![1.0, -1.0];
        opt.step(p.view_mut(), array![2.0, -0.5].view()).unwrap();
        assert_relative_eq!(p[0], 0.9, epsilon = 1e-6);
        assert_relative_eq!(p[1], -0.9, epsilon = 1e-6);
        assert_eq!(opt.steps(), 1);
    }

    #[test]
    // Purpose
    // -------
    // AMSGrad keeps the running maximum of v, so after a large gradient
    // followed by a small one its step is smaller than plain Adam's.
    fn amsgrad_uses_running_maximum() {
        let mut adam = Adam::new(0.1, false).unwrap();
        let mut ams = Adam::new(0.1, true).unwrap();
        let mut pa = array![0.0];
        let mut pm = array![0.0];
        for g in [10.0, 0.01, 0.01, 0.01] {
            adam.step(pa.view_mut(), array![g].view()).unwrap();
            ams.step(pm.view_mut(), array![g].view()).unwrap();
        }
        // Both moved in the negative direction; AMSGrad moved less.
        assert!(pm[0] < 0.0 && pa[0] < 0.0);
        assert!(pm[0] > pa[0]);
    }

    #[test]
    // Given p = 1, g = 1, lr = 0.1, μ = 0.5: the momentum buffer starts at g.
    fn sgd_variants_first_two_steps() {
        let mut plain = Sgd::new(0.1, None, false).unwrap();
        let mut p = array![1.0];
        plain.step(p.view_mut(), array![1.0].view()).unwrap();
        assert_relative_eq!(p[0], 0.9);

        let mut heavy = Sgd::new(0.1, Some(0.5), false).unwrap();
        let mut p = array![1.0];
        heavy.step(p.view_mut(), array![1.0].view()).unwrap();
        heavy.step(p.view_mut(), array![1.0].view()).unwrap();
        // buf: 1, then 1.5 → 1 - 0.1 - 0.15.
        assert_relative_eq!(p[0], 0.75);

        let mut nesterov = Sgd::new(0.1, Some(0.5), true).unwrap();
        let mut p = array![1.0];
        nesterov.step(p.view_mut(), array![1.0].view()).unwrap();
        // g + μ·buf = 1 + 0.5 → 1 - 0.15.
        assert_relative_eq!(p[0], 0.85);
    }

    #[test]
    // Every configuration minimises f(p) = ½‖p - c‖².
    fn all_configs_converge_on_quadratic() {
        let target = array![3.0, -2.0];
        let configs = [
            get_optimizer("adam", None).unwrap(),
            get_optimizer("amsgrad", None).unwrap(),
            get_optimizer("sgd", None).unwrap(),
            get_optimizer("sgd", Some(0.9)).unwrap(),
        ];
        for config in configs {
            let lr = if matches!(config, OptimizerConfig::Adam { .. }) { 0.05 } else { 0.1 };
            let mut opt = config.build(lr).unwrap();
            let mut p = array![0.0, 0.0];
            for _ in 0..2000 {
                let grad = &p - &target;
                opt.step(p.view_mut(), grad.view()).unwrap();
            }
            assert_relative_eq!(p[0], 3.0, epsilon = 1e-3);
            assert_relative_eq!(p[1], -2.0, epsilon = 1e-3);
            assert_eq!(opt.learning_rate(), lr, "{config}");
        }
    }

    #[test]
    fn rejects_bad_settings_and_shapes() {
        assert_eq!(Adam::new(0.0, false).unwrap_err(), TrainingError::InvalidLearningRate { value: 0.0 });
        assert!(Sgd::new(f64::NAN, None, false).is_err());
        assert!(Sgd::new(0.1, Some(-0.1), true).is_err());

        let mut opt = Adam::new(0.1, false).unwrap();
        let mut p = array![0.0, 0.0];
        assert!(matches!(
            opt.step(p.view_mut(), array![1.0].view()),
            Err(TrainingError::ShapeMismatch { what: "gradient", .. })
        ));
        opt.step(p.view_mut(), array![1.0, 1.0].view()).unwrap();
        let mut q = array![0.0, 0.0, 0.0];
        assert!(matches!(
            opt.step(q.view_mut(), array![1.0, 1.0, 1.0].view()),
            Err(TrainingError::ShapeMismatch { what: "parameters", .. })
        ));
    }
}
