// metadiff-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file in the same directory.
///
/// The target is either fully written or left untouched; reports and extract files are never
/// observed half-written.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Move `from` to `to`, replacing any existing file.
pub fn move_replacing(from: &Path, to: &Path) -> Result<(), InfrastructureError> {
    if to.exists() {
        std::fs::remove_file(to)?;
    }
    if std::fs::rename(from, to).is_err() {
        // Cross-device: copy then delete.
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.html");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        assert_eq!(fs::read_to_string(file_path)?, "Updated");
        Ok(())
    }

    #[test]
    fn test_move_replacing() -> Result<()> {
        let dir = tempdir()?;
        let from = dir.path().join("a.zip");
        let to = dir.path().join("archived.zip");
        fs::write(&from, "new")?;
        fs::write(&to, "old")?;

        move_replacing(&from, &to)?;

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(to)?, "new");
        Ok(())
    }
}
