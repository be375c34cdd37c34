use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The target is either fully written or left untouched. Missing parent
/// directories are created. With `overwrite == false` an existing target is
/// an error.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
    overwrite: bool,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    if !overwrite && path.exists() {
        return Err(InfrastructureError::OutputExists(path.display().to_string()));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    // Same directory as the target so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Lower-cased extension of `path`, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("nested/deeper/pcigale.ini");

        atomic_write(&file_path, "data_file = cigale_in.fits\n", true)?;

        assert_eq!(
            fs::read_to_string(file_path)?,
            "data_file = cigale_in.fits\n"
        );
        Ok(())
    }

    #[test]
    fn test_overwrite_flag() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("cigale_in.txt");

        atomic_write(&file_path, "first", true)?;
        let refused = atomic_write(&file_path, "second", false);
        assert!(matches!(refused, Err(InfrastructureError::OutputExists(_))));
        assert_eq!(fs::read_to_string(&file_path)?, "first");

        atomic_write(&file_path, "second", true)?;
        assert_eq!(fs::read_to_string(&file_path)?, "second");
        Ok(())
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension(Path::new("a/b/cat.FITS")), "fits");
        assert_eq!(extension(Path::new("noext")), "");
    }
}
