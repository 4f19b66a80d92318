//! arrays::resample: joint shuffling, truncation and bootstrap of parallel arrays.
//!
//! Purpose
//! -------
//! Training samples are stored as several parallel arrays (features, labels,
//! ratios, scores, parameter points) whose first axis indexes events. The
//! helpers here reorder or subsample all of them consistently.
//!
//! Key behaviors
//! -------------
//! - [`shuffle`] draws one permutation and applies it to every array.
//! - [`restrict_samplesize`] keeps the first `n` events of every array
//!   without copying.
//! - [`bootstrap`] draws `n` event indices with replacement and applies them
//!   to every array.
//! - [`balance_thetas`] cycles theta-set lists so that they share a length.
//!
//! Invariants & assumptions
//! ------------------------
//! - `None` entries stand for absent optional arrays and are passed through
//!   unchanged, at the same position.
//! - All present arrays must have at least one axis and agree on the length
//!   of axis 0; this is checked before any randomness is consumed.
//!
//! Conventions
//! -----------
//! - Random routines take `&mut R: Rng` so callers control seeding;
//!   [`shuffle_default`] is the convenience form using the thread RNG.

use ndarray::{Array, ArrayBase, ArrayD, ArrayViewD, Axis, Data, Dimension, RemoveAxis, Slice};
use rand::{Rng, seq::SliceRandom};

use crate::arrays::errors::{ArrayError, ArrayResult};

/// A permutation of `0..n`, applied along axis 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Uniformly random permutation of `0..n`.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Reorder the rows (axis 0) of `array`.
    ///
    /// # Errors
    /// - [`ArrayError::ZeroDimensional`] for 0-d arrays.
    /// - [`ArrayError::LengthMismatch`] if axis 0 does not have `self.len()` rows.
    pub fn apply<A, S, D>(&self, array: &ArrayBase<S, D>) -> ArrayResult<Array<A, D>>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: Dimension + RemoveAxis,
    {
        if array.ndim() == 0 {
            return Err(ArrayError::ZeroDimensional { position: 0 });
        }
        let rows = array.len_of(Axis(0));
        if rows != self.len() {
            return Err(ArrayError::LengthMismatch {
                what: "permuted array",
                expected: self.len(),
                found: rows,
            });
        }
        Ok(array.select(Axis(0), &self.indices))
    }
}

/// Common axis-0 length of the present arrays, or `None` if all are absent.
fn common_len<A>(arrays: &[Option<ArrayViewD<'_, A>>]) -> ArrayResult<Option<usize>> {
    let mut n_samples: Option<usize> = None;
    for (position, a) in arrays.iter().enumerate() {
        let Some(a) = a else { continue };
        if a.ndim() == 0 {
            return Err(ArrayError::ZeroDimensional { position });
        }
        let rows = a.len_of(Axis(0));
        match n_samples {
            None => n_samples = Some(rows),
            Some(expected) if expected != rows => {
                return Err(ArrayError::LengthMismatch {
                    what: "parallel arrays",
                    expected,
                    found: rows,
                });
            }
            Some(_) => {}
        }
    }
    Ok(n_samples)
}

/// Shuffle several parallel arrays with one common permutation of axis 0.
pub fn shuffle<A, R>(
    arrays: &[Option<ArrayViewD<'_, A>>], rng: &mut R,
) -> ArrayResult<Vec<Option<ArrayD<A>>>>
where
    A: Clone,
    R: Rng + ?Sized,
{
    let Some(n_samples) = common_len(arrays)? else {
        return Ok(vec![None; arrays.len()]);
    };
    let permutation = Permutation::random(n_samples, rng);
    arrays
        .iter()
        .map(|a| a.as_ref().map(|a| permutation.apply(a)).transpose())
        .collect()
}

/// [`shuffle`] with the thread-local RNG.
pub fn shuffle_default<A: Clone>(
    arrays: &[Option<ArrayViewD<'_, A>>],
) -> ArrayResult<Vec<Option<ArrayD<A>>>> {
    shuffle(arrays, &mut rand::rng())
}

/// Keep the first `n` rows of every present array (all rows if fewer).
///
/// Returns views into the inputs; nothing is copied.
pub fn restrict_samplesize<'a, A>(
    n: usize, arrays: &[Option<ArrayViewD<'a, A>>],
) -> ArrayResult<Vec<Option<ArrayViewD<'a, A>>>> {
    arrays
        .iter()
        .enumerate()
        .map(|(position, a)| match a {
            None => Ok(None),
            Some(a) if a.ndim() == 0 => Err(ArrayError::ZeroDimensional { position }),
            Some(a) => {
                let end = n.min(a.len_of(Axis(0)));
                Ok(Some(a.clone().slice_axis_move(Axis(0), Slice::from(..end))))
            }
        })
        .collect()
}

/// Resample `n` rows with replacement, jointly for all present arrays.
///
/// # Errors
/// - Length errors as for [`shuffle`].
/// - [`ArrayError::EmptyValues`] if rows are requested from empty arrays.
pub fn bootstrap<A, R>(
    n: usize, arrays: &[Option<ArrayViewD<'_, A>>], rng: &mut R,
) -> ArrayResult<Vec<Option<ArrayD<A>>>>
where
    A: Clone,
    R: Rng + ?Sized,
{
    let Some(n_samples) = common_len(arrays)? else {
        return Ok(vec![None; arrays.len()]);
    };
    if n_samples == 0 && n > 0 {
        return Err(ArrayError::EmptyValues);
    }
    let indices: Vec<usize> = (0..n).map(|_| rng.random_range(0..n_samples)).collect();
    Ok(arrays.iter().map(|a| a.as_ref().map(|a| a.select(Axis(0), &indices))).collect())
}

/// Cycle theta-set lists so that every set has as many entries as the longest.
///
/// `types[i]` and `values[i]` describe the same set and must have equal
/// length. Set `i` is extended to `entry[j % len_i]` for `j` in `0..n_max`.
///
/// # Errors
/// - [`ArrayError::LengthMismatch`] if the outer lists or a set's type and
///   value lists differ in length.
/// - [`ArrayError::EmptyThetaSet`] if an empty set would need extending.
pub fn balance_thetas<T: Clone, U: Clone>(
    types: Vec<Vec<T>>, values: Vec<Vec<U>>,
) -> ArrayResult<(Vec<Vec<T>>, Vec<Vec<U>>)> {
    if types.len() != values.len() {
        return Err(ArrayError::LengthMismatch {
            what: "theta set lists",
            expected: types.len(),
            found: values.len(),
        });
    }
    let n_sets = types.iter().map(Vec::len).max().unwrap_or(0);

    let mut balanced_types = Vec::with_capacity(types.len());
    let mut balanced_values = Vec::with_capacity(values.len());
    for (index, (t, v)) in types.into_iter().zip(values).enumerate() {
        if t.len() != v.len() {
            return Err(ArrayError::LengthMismatch {
                what: "theta set values",
                expected: t.len(),
                found: v.len(),
            });
        }
        if t.len() == n_sets {
            balanced_types.push(t);
            balanced_values.push(v);
            continue;
        }
        if t.is_empty() {
            return Err(ArrayError::EmptyThetaSet { index, target: n_sets });
        }
        balanced_types.push(t.iter().cycle().take(n_sets).cloned().collect());
        balanced_values.push(v.iter().cycle().take(n_sets).cloned().collect());
    }
    Ok((balanced_types, balanced_values))
}
