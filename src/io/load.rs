//! io::load: load `.npy` sample files and report data-quality problems.
//!
//! Purpose
//! -------
//! Bring simulator output stored as NumPy `.npy` files into memory (or map
//! it, for very large files) and emit warnings about NaNs, infinities and
//! suspiciously large values before the data reach a training loop.
//!
//! Key behaviors
//! -------------
//! - Owned loads accept any integer, float or bool `.npy` dtype and convert
//!   to `f64`.
//! - Memory mapping is opt-in and only used above a file-size threshold
//!   (1 GiB by default). The mapping is copy-on-write: the returned array
//!   can be modified without touching the file.
//! - Owned data are scanned once; the counts and the NaN-ignoring range are
//!   returned as a [`DataSummary`] and logged at `warn` level when they look
//!   wrong.
//!
//! Invariants & assumptions
//! ------------------------
//! - Mapped arrays must be little-endian `f64` in C order; other layouts fall
//!   back to an owned load.
//! - Mapped data are not scanned, since that would touch every page.
//!
//! Conventions
//! -----------
//! - Logging goes through the `log` facade; the library never installs a
//!   logger.
//! - An absent source (`None`) is not an error and yields `Ok(None)`.

use std::{
    fmt,
    fs::{self, File},
    path::{Path, PathBuf},
};

use memmap2::{MmapMut, MmapOptions};
use ndarray::{ArrayBase, ArrayD, ArrayViewD, ArrayViewMutD, Axis, Data, Dimension};
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement, ViewMutNpyExt, ViewNpyExt};

use crate::io::errors::{DataError, DataResult};

/// Default magnitude above which a loaded file triggers a warning.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 1.0e9;

/// Default file size (bytes) above which a requested memmap is honoured.
pub const DEFAULT_MEMMAP_MIN_BYTES: u64 = 1 << 30;

/// Where the data come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Path to a `.npy` file.
    Path(PathBuf),
    /// Data already in memory; only checked.
    Array(ArrayD<f64>),
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        DataSource::Path(path.to_path_buf())
    }
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        DataSource::Path(PathBuf::from(path))
    }
}

impl From<ArrayD<f64>> for DataSource {
    fn from(array: ArrayD<f64>) -> Self {
        DataSource::Array(array)
    }
}

/// Options for [`load_and_check`].
///
/// Default: `warning_threshold = 1e9`, `memmap = false`,
/// `memmap_min_bytes = 1 GiB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub warning_threshold: f64,
    pub memmap: bool,
    pub memmap_min_bytes: u64,
}

impl LoadOptions {
    /// # Errors
    /// - [`DataError::InvalidThreshold`] unless `warning_threshold` is finite and `> 0`.
    pub fn new(warning_threshold: f64, memmap: bool, memmap_min_bytes: u64) -> DataResult<Self> {
        if !warning_threshold.is_finite() || warning_threshold <= 0.0 {
            return Err(DataError::InvalidThreshold { value: warning_threshold });
        }
        Ok(Self { warning_threshold, memmap, memmap_min_bytes })
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            memmap: false,
            memmap_min_bytes: DEFAULT_MEMMAP_MIN_BYTES,
        }
    }
}

/// Counts of NaN / infinite / finite entries and the NaN-ignoring range.
///
/// `min` and `max` are `None` when there is no non-NaN entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataSummary {
    pub n_nan: usize,
    pub n_inf: usize,
    pub n_finite: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DataSummary {
    pub fn of<S, D>(data: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let mut summary = DataSummary { n_nan: 0, n_inf: 0, n_finite: 0, min: None, max: None };
        for &v in data.iter() {
            if v.is_nan() {
                summary.n_nan += 1;
                continue;
            }
            if v.is_infinite() {
                summary.n_inf += 1;
            } else {
                summary.n_finite += 1;
            }
            summary.min = Some(summary.min.map_or(v, |m| m.min(v)));
            summary.max = Some(summary.max.map_or(v, |m| m.max(v)));
        }
        summary
    }

    pub fn has_non_finite(&self) -> bool {
        self.n_nan + self.n_inf > 0
    }

    /// `true` if `|min|` or `|max|` is above `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        let big = |v: Option<f64>| v.is_some_and(|v| v.abs() > threshold);
        big(self.min) || big(self.max)
    }
}

/// Copy-on-write memory map of an `f64` `.npy` file.
pub struct MappedArray {
    path: PathBuf,
    mmap: MmapMut,
}

impl MappedArray {
    /// Map `path` privately and check that it decodes as an `f64` array.
    pub fn open(path: &Path) -> DataResult<Self> {
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        // SAFETY: the mapping is private (copy-on-write), so our writes never
        // reach the file. Concurrent external modification of the file is
        // outside what we can guard against, as with any mmap.
        let mmap = unsafe { MmapOptions::new().map_copy(&file) }.map_err(|e| DataError::io(path, e))?;
        let mapped = Self { path: path.to_path_buf(), mmap };
        mapped.view()?;
        Ok(mapped)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn view(&self) -> DataResult<ArrayViewD<'_, f64>> {
        ArrayViewD::<f64>::view_npy(&self.mmap[..]).map_err(|e| DataError::Npy {
            path: self.path.display().to_string(),
            text: e.to_string(),
        })
    }

    /// Mutable view; writes stay private to this process.
    pub fn view_mut(&mut self) -> DataResult<ArrayViewMutD<'_, f64>> {
        let path = self.path.display().to_string();
        ArrayViewMutD::<f64>::view_mut_npy(&mut self.mmap[..])
            .map_err(|e| DataError::Npy { path, text: e.to_string() })
    }
}

impl fmt::Debug for MappedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedArray")
            .field("path", &self.path)
            .field("bytes", &self.mmap.len())
            .finish()
    }
}

/// Loaded data, either owned or memory mapped.
#[derive(Debug)]
pub enum LoadedArray {
    Owned(ArrayD<f64>),
    Mapped(MappedArray),
}

impl LoadedArray {
    pub fn view(&self) -> DataResult<ArrayViewD<'_, f64>> {
        match self {
            LoadedArray::Owned(a) => Ok(a.view()),
            LoadedArray::Mapped(m) => m.view(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, LoadedArray::Mapped(_))
    }

    /// Copy mapped data into memory; owned data are returned as is.
    pub fn into_owned(self) -> DataResult<ArrayD<f64>> {
        match self {
            LoadedArray::Owned(a) => Ok(a),
            LoadedArray::Mapped(m) => Ok(m.view()?.to_owned()),
        }
    }
}

/// Result of [`load_and_check`]. `summary` is `None` for mapped data.
#[derive(Debug)]
pub struct Loaded {
    pub data: LoadedArray,
    pub summary: Option<DataSummary>,
}

/// Load (or pass through) an array and log data-quality warnings.
///
/// # Errors
/// - [`DataError::Io`] if the file cannot be stated, read or mapped.
/// - [`DataError::Npy`] if the file is not a numeric `.npy` array.
pub fn load_and_check(source: Option<DataSource>, opts: &LoadOptions) -> DataResult<Option<Loaded>> {
    let Some(source) = source else {
        return Ok(None);
    };

    let path = match source {
        DataSource::Array(array) => return Ok(Some(check_owned("<in-memory array>", array, opts))),
        DataSource::Path(path) => path,
    };
    let name = path.display().to_string();

    let memmap = opts.memmap && {
        let size = fs::metadata(&path).map_err(|e| DataError::io(&path, e))?.len();
        size > opts.memmap_min_bytes
    };

    if memmap {
        log::info!("Loading {name} as memmap");
        log::debug!("Trying to load {name} with memmap.");
        match MappedArray::open(&path) {
            Ok(mapped) => {
                let view = mapped.view()?;
                log::debug!(
                    "Loaded {name} with memmap. Found shape {:?}, dtype f64, and first entry\n{}",
                    view.shape(),
                    FirstEntry(&view)
                );
                log::debug!("Skipping NaN check for memmap-ed data");
                return Ok(Some(Loaded { data: LoadedArray::Mapped(mapped), summary: None }));
            }
            Err(err) => {
                log::debug!("Cannot memmap {name} ({err}), loading it into memory instead");
            }
        }
    }

    let bytes = fs::read(&path).map_err(|e| DataError::io(&path, e))?;
    let array = read_as_f64(&bytes)
        .map_err(|e| DataError::Npy { path: name.clone(), text: e.to_string() })?;
    Ok(Some(check_owned(&name, array, opts)))
}

fn check_owned(name: &str, array: ArrayD<f64>, opts: &LoadOptions) -> Loaded {
    let summary = DataSummary::of(&array);

    if summary.has_non_finite() {
        log::warn!(
            "Warning: file {name} contains {} NaNs and {} Infs, compared to {} finite numbers!",
            summary.n_nan,
            summary.n_inf,
            summary.n_finite
        );
    }
    if summary.exceeds(opts.warning_threshold) {
        if let (Some(smallest), Some(largest)) = (summary.min, summary.max) {
            log::warn!("Warning: file {name} has some large numbers, ranging from {smallest} to {largest}");
        }
    }

    Loaded { data: LoadedArray::Owned(array), summary: Some(summary) }
}

/// Decode `.npy` bytes of any supported element type into `f64`.
fn read_as_f64(bytes: &[u8]) -> Result<ArrayD<f64>, ReadNpyError> {
    if let Some(a) = try_read::<f64>(bytes, |v| v)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<f32>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<i64>(bytes, |v| v as f64)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<i32>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<i16>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<i8>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<u64>(bytes, |v| v as f64)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<u32>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<u16>(bytes, f64::from)? {
        return Ok(a);
    }
    if let Some(a) = try_read::<u8>(bytes, f64::from)? {
        return Ok(a);
    }
    // Last candidate: its error (if any) is the one reported.
    let a = ArrayD::<bool>::read_npy(bytes)?;
    Ok(a.mapv(|v| if v { 1.0 } else { 0.0 }))
}

/// `Ok(None)` when the file holds a different element type.
fn try_read<T>(bytes: &[u8], to_f64: impl Fn(T) -> f64) -> Result<Option<ArrayD<f64>>, ReadNpyError>
where
    T: ReadableElement + Clone,
{
    match ArrayD::<T>::read_npy(bytes) {
        Ok(a) => Ok(Some(a.mapv(to_f64))),
        Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Displays `data[0]` the way an array row would be printed.
struct FirstEntry<'a, 'b>(&'a ArrayViewD<'b, f64>);

impl fmt::Display for FirstEntry<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        if view.ndim() == 0 {
            write!(f, "{view}")
        } else if view.len_of(Axis(0)) == 0 {
            write!(f, "<empty>")
        } else {
            write!(f, "{}", view.index_axis(Axis(0), 0))
        }
    }
}
