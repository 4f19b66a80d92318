//! rust_lfi: numerical helpers for likelihood-free inference, with optional
//! Python bindings.
//!
//! Purpose
//! -------
//! Provide the numerical glue around simulation-based inference estimators
//! (carl, rolr, cascal, rascal, alice, alices): cleaning and summarising
//! sample arrays, loading simulator output, resampling parallel arrays, and
//! selecting loss sets, optimizers and activations by name. When the
//! `python-bindings` feature is enabled, the array helpers are also exposed
//! to Python through the `_rust_lfi` extension module.
//!
//! Key behaviors
//! -------------
//! - [`numerics`]: sigmoid, `s ↔ r` odds transforms, cleaning of estimated
//!   log-ratios and scores.
//! - [`arrays`]: NaN/∞ sanitisation with clipping, weighted quantiles,
//!   shuffle / restrict / bootstrap of parallel arrays, theta-set balancing.
//! - [`io`]: `.npy` loading (owned or copy-on-write memmap) with NaN/Inf and
//!   range diagnostics, output-folder creation.
//! - [`training`]: method → weighted loss terms, optimizer and activation
//!   lookup, parameter NaN checks, validated trainer options.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numeric data are `f64` in `ndarray` containers; axis 0 indexes
//!   events.
//! - Fallible operations return module-specific error enums; library code
//!   does not panic on user input.
//!
//! Conventions
//! -----------
//! - Only [`io`] logs (through the `log` facade) or touches the filesystem.
//! - Random routines take an explicit `Rng` so that runs are reproducible.
//! - Errors convert to `PyErr` at the PyO3 boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds an end-to-end
//!   pipeline test on temporary `.npy` files.

pub mod arrays;
pub mod io;
pub mod numerics;
pub mod training;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Ix1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    arrays::{QuantileOptions, SanitizeOptions},
    numerics::{DEFAULT_LOG_R_CLIP, DEFAULT_R_EPS, DEFAULT_T_CLIP},
    utils::{extract_f64_array, extract_optional_f64_array},
};

/// weighted_quantile(values, quantiles, sample_weight=None, values_sorted=False, old_style=False)
///
/// Quantiles of `values` where each entry carries a non-negative weight.
/// All array arguments must be one-dimensional.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (values, quantiles, sample_weight = None, values_sorted = false, old_style = false))]
fn weighted_quantile<'py>(
    py: Python<'py>, values: &Bound<'py, PyAny>, quantiles: &Bound<'py, PyAny>,
    sample_weight: Option<&Bound<'py, PyAny>>, values_sorted: bool, old_style: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let values = extract_f64_array(py, values)?;
    let quantiles = extract_f64_array(py, quantiles)?;
    let weights = extract_optional_f64_array(py, sample_weight)?;

    let values = values.as_array().into_dimensionality::<Ix1>().map_err(|_| not_1d("values"))?;
    let quantiles =
        quantiles.as_array().into_dimensionality::<Ix1>().map_err(|_| not_1d("quantiles"))?;
    let weights = match weights.as_ref() {
        Some(w) => {
            Some(w.as_array().into_dimensionality::<Ix1>().map_err(|_| not_1d("sample_weight"))?)
        }
        None => None,
    };

    let opts = QuantileOptions { values_sorted, old_style };
    let out = arrays::weighted_quantile(values, quantiles, weights, opts)?;
    Ok(out.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
fn not_1d(name: &str) -> PyErr {
    PyValueError::new_err(format!("{name} must be one-dimensional"))
}

/// sanitize_array(array, replace_nan=0.0, replace_inf=0.0, replace_neg_inf=0.0, min_value=None, max_value=None)
///
/// Returns a cleaned copy; the input array is not modified.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    array, replace_nan = 0.0, replace_inf = 0.0, replace_neg_inf = 0.0,
    min_value = None, max_value = None
))]
fn sanitize_array<'py>(
    py: Python<'py>, array: &Bound<'py, PyAny>, replace_nan: f64, replace_inf: f64,
    replace_neg_inf: f64, min_value: Option<f64>, max_value: Option<f64>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let opts = SanitizeOptions::new(replace_nan, replace_inf, replace_neg_inf, min_value, max_value)?;
    let arr = extract_f64_array(py, array)?;
    let (out, _report) = arrays::sanitized(&arr.as_array(), &opts);
    Ok(out.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn sigmoid<'py>(py: Python<'py>, x: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let arr = extract_f64_array(py, x)?;
    Ok(numerics::sigmoid_array(&arr.as_array()).into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn s_from_r<'py>(py: Python<'py>, r: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let arr = extract_f64_array(py, r)?;
    Ok(numerics::s_from_r_array(&arr.as_array()).into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (s, epsilon = DEFAULT_R_EPS))]
fn r_from_s<'py>(
    py: Python<'py>, s: &Bound<'py, PyAny>, epsilon: f64,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let arr = extract_f64_array(py, s)?;
    Ok(numerics::r_from_s_array(&arr.as_array(), epsilon).into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (log_r, log_r_clip = DEFAULT_LOG_R_CLIP))]
fn clean_log_r<'py>(
    py: Python<'py>, log_r: &Bound<'py, PyAny>, log_r_clip: f64,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let arr = extract_f64_array(py, log_r)?;
    Ok(numerics::clean_log_r(&arr.as_array(), log_r_clip).into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (t, t_clip = DEFAULT_T_CLIP))]
fn clean_t<'py>(
    py: Python<'py>, t: &Bound<'py, PyAny>, t_clip: f64,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let arr = extract_f64_array(py, t)?;
    Ok(numerics::clean_t(&arr.as_array(), t_clip).into_pyarray(py))
}

/// PyO3 module initializer for `_rust_lfi`.
///
/// Registers the array helpers directly on the extension module; the
/// pure-Python package re-exports them.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_lfi<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(weighted_quantile, m)?)?;
    m.add_function(wrap_pyfunction!(sanitize_array, m)?)?;
    m.add_function(wrap_pyfunction!(sigmoid, m)?)?;
    m.add_function(wrap_pyfunction!(s_from_r, m)?)?;
    m.add_function(wrap_pyfunction!(r_from_s, m)?)?;
    m.add_function(wrap_pyfunction!(clean_log_r, m)?)?;
    m.add_function(wrap_pyfunction!(clean_t, m)?)?;
    Ok(())
}
