//! Conversion helpers for the Python bindings.

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

/// Borrow a float64 array from `numpy.ndarray`, `pandas` objects (via
/// `to_numpy`) or any sequence `numpy.asarray` accepts.
///
/// Only the last path copies; contiguous float64 arrays are borrowed as is.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(arr_ro) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(arr_ro);
        }
    }

    let converted = py.import("numpy")?.call_method1("asarray", (raw_data, "float64"))?;
    converted.extract::<PyReadonlyArrayDyn<f64>>().map_err(|_| {
        PyTypeError::new_err("expected a numpy.ndarray, pandas object, or sequence of float64")
    })
}

/// Optional variant of [`extract_f64_array`] for arguments that default to `None`.
#[cfg(feature = "python-bindings")]
pub fn extract_optional_f64_array<'py>(
    py: Python<'py>, raw_data: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<PyReadonlyArrayDyn<'py, f64>>> {
    match raw_data {
        Some(obj) if !obj.is_none() => extract_f64_array(py, obj).map(Some),
        _ => Ok(None),
    }
}
