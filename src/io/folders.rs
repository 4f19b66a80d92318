//! Output folder creation ahead of a run.

use std::{fs, path::Path};

use crate::io::errors::{DataError, DataResult};

/// Create every folder in `folders` that does not exist yet, including
/// parents. Empty paths are skipped.
///
/// # Errors
/// - [`DataError::NotADirectory`] if a path exists but is not a directory.
/// - [`DataError::Io`] if creation fails.
pub fn create_missing_folders<I, P>(folders: I) -> DataResult<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for folder in folders {
        let folder = folder.as_ref();
        if folder.as_os_str().is_empty() {
            continue;
        }
        if !folder.exists() {
            log::debug!("Creating folder {}", folder.display());
            fs::create_dir_all(folder).map_err(|e| DataError::io(folder, e))?;
        } else if !folder.is_dir() {
            return Err(DataError::NotADirectory { path: folder.display().to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_folders_and_skips_empty_entries() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let existing = dir.path().to_path_buf();

        create_missing_folders([nested.clone(), "".into(), existing]).unwrap();

        assert!(nested.is_dir());
    }

    #[test]
    fn existing_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not_a_folder");
        std::fs::write(&file, b"x").unwrap();

        let err = create_missing_folders([&file]).unwrap_err();
        assert!(matches!(err, DataError::NotADirectory { .. }));
        assert!(err.to_string().contains("is no directory"));
    }
}
