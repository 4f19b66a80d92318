//! io: sample-file loading with diagnostics, and folder preparation.
//!
//! Purpose
//! -------
//! Read `.npy` arrays written by the simulation step, optionally through a
//! copy-on-write memory map for very large files, and flag NaNs, infinities
//! and extreme values through the `log` facade.
//!
//! Key behaviors
//! -------------
//! - [`load_and_check`] accepts a path, an in-memory array, or nothing.
//! - [`DataSummary`] counts non-finite entries and tracks the range.
//! - [`create_missing_folders`] prepares output directories.
//!
//! Conventions
//! -----------
//! - This is the only module in the crate that logs or touches the
//!   filesystem.
//! - Failures surface as [`DataError`], which converts to `OSError` /
//!   `ValueError` under the `python-bindings` feature.

pub mod errors;
pub mod folders;
pub mod load;

pub use self::errors::{DataError, DataResult};
pub use self::folders::create_missing_folders;
pub use self::load::{
    DEFAULT_MEMMAP_MIN_BYTES, DEFAULT_WARNING_THRESHOLD, DataSource, DataSummary, LoadOptions,
    Loaded, LoadedArray, MappedArray, load_and_check,
};

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::folders::create_missing_folders;
    pub use super::load::{DataSource, LoadOptions, load_and_check};
}
