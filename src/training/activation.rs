//! Activation functions selectable by name.

use std::{fmt, str::FromStr};

use ndarray::{Array, ArrayBase, Data, DataMut, Dimension};

use crate::{
    numerics::sigmoid,
    training::errors::{TrainingError, TrainingResult},
};

/// Element-wise nonlinearity used between network layers.
///
/// Parsing accepts `"relu"`, `"tanh"` and `"sigmoid"` (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => sigmoid(x),
        }
    }

    /// Derivative with respect to the input.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
        }
    }

    pub fn apply_array<S, D>(&self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        x.mapv(|v| self.apply(v))
    }

    pub fn apply_inplace<S, D>(&self, x: &mut ArrayBase<S, D>)
    where
        S: DataMut<Elem = f64>,
        D: Dimension,
    {
        x.mapv_inplace(|v| self.apply(v));
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
        }
    }
}

impl FromStr for Activation {
    type Err = TrainingError;

    fn from_str(s: &str) -> TrainingResult<Self> {
        match s.to_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            _ => Err(TrainingError::UnknownActivation {
                name: s.to_string(),
                reason: "Valid options are 'relu', 'tanh' or 'sigmoid'.",
            }),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("relu".parse::<Activation>().unwrap(), Activation::Relu);
        assert_eq!("TANH".parse::<Activation>().unwrap(), Activation::Tanh);
        assert_eq!("Sigmoid".parse::<Activation>().unwrap(), Activation::Sigmoid);

        let err = "softsign".parse::<Activation>().unwrap_err();
        assert!(matches!(err, TrainingError::UnknownActivation { ref name, .. } if name == "softsign"));
    }

    #[test]
    fn applies_element_wise() {
        let x = array![-1.0, 0.0, 2.0];
        assert_eq!(Activation::Relu.apply_array(&x), array![0.0, 0.0, 2.0]);
        assert_relative_eq!(Activation::Tanh.apply(0.5), 0.5_f64.tanh());
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);

        let mut y = x.clone();
        Activation::Relu.apply_inplace(&mut y);
        assert_eq!(y, array![0.0, 0.0, 2.0]);
    }

    #[test]
    // Derivatives agree with central finite differences away from the ReLU kink.
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for act in [Activation::Relu, Activation::Tanh, Activation::Sigmoid] {
            for &x in &[-1.3, -0.2, 0.4, 2.5] {
                let fd = (act.apply(x + h) - act.apply(x - h)) / (2.0 * h);
                assert_relative_eq!(act.derivative(x), fd, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for act in [Activation::Relu, Activation::Tanh, Activation::Sigmoid] {
            assert_eq!(act.to_string().parse::<Activation>().unwrap(), act);
        }
    }
}
