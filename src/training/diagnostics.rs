//! NaN checks over model parameters and their gradients.

use ndarray::ArrayViewD;

/// A parameter tensor together with its gradient, if one has been computed.
#[derive(Debug, Clone)]
pub struct ParamView<'a> {
    pub value: ArrayViewD<'a, f64>,
    pub grad: Option<ArrayViewD<'a, f64>>,
}

impl<'a> ParamView<'a> {
    pub fn new(value: ArrayViewD<'a, f64>, grad: Option<ArrayViewD<'a, f64>>) -> Self {
        Self { value, grad }
    }
}

/// `true` if any parameter, or (with `check_gradients`) any available
/// gradient, contains a NaN. Parameters without a gradient are not flagged.
pub fn check_for_nans_in_parameters<'a, I>(params: I, check_gradients: bool) -> bool
where
    I: IntoIterator<Item = ParamView<'a>>,
{
    params.into_iter().any(|p| {
        p.value.iter().any(|v| v.is_nan())
            || (check_gradients && p.grad.is_some_and(|g| g.iter().any(|v| v.is_nan())))
    })
}
