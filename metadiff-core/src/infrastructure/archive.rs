// metadiff-core/src/infrastructure/archive.rs

// One zip per extraction run. Entries are stored flat, by file name.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::move_replacing;

/// Package `files` into `archive_path`, atomically replacing any previous archive.
pub fn pack(archive_path: &Path, files: &[PathBuf]) -> Result<(), InfrastructureError> {
    let parent = archive_path.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::NamedTempFile::new_in(parent)?;

    let mut zip = ZipWriter::new(temp);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                InfrastructureError::Io(io::Error::other(format!("Not a file: {:?}", file)))
            })?;
        debug!(entry = %name, "Adding to archive");
        zip.start_file(name, options)?;
        io::copy(&mut File::open(file)?, &mut zip)?;
    }

    let temp = zip.finish()?;
    temp.persist(archive_path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

fn open(archive_path: &Path) -> Result<ZipArchive<File>, InfrastructureError> {
    let file = File::open(archive_path)?;
    ZipArchive::new(file).map_err(|source| InfrastructureError::ArchiveCorruption {
        path: archive_path.to_path_buf(),
        source,
    })
}

pub fn list_entries(archive_path: &Path) -> Result<Vec<String>, InfrastructureError> {
    let archive = open(archive_path)?;
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    Ok(names)
}

/// Expand `archive_path` into `dest`, returning the extracted files.
///
/// Entries are first extracted into a scratch directory inside `dest` and only moved into `dest`
/// once every entry has been read and checksummed. A corrupt archive leaves `dest` untouched.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    let mut archive = open(archive_path)?;
    let mut names: Vec<PathBuf> = (0..archive.len())
        .filter_map(|idx| {
            let entry = archive.by_index(idx).ok()?;
            if entry.is_dir() {
                return None;
            }
            entry.enclosed_name()
        })
        .collect();
    names.sort();

    let scratch = tempfile::tempdir_in(dest)?;
    archive
        .extract(scratch.path())
        .map_err(|source| InfrastructureError::ArchiveCorruption {
            path: archive_path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let target = dest.join(&name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        move_replacing(&scratch.path().join(&name), &target)?;
        entries.push(target);
    }
    Ok(entries)
}

/// Archive whose second entry fails its checksum; the first entry is intact.
#[cfg(test)]
pub(crate) fn write_archive_with_bad_checksum(
    archive_path: &Path,
    first: (&str, &str),
    second: (&str, &str),
    marker: &str,
) -> anyhow::Result<()> {
    use std::io::Write;

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in [first, second] {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;

    let mut bytes = std::fs::read(archive_path)?;
    let at = bytes
        .windows(marker.len())
        .position(|w| w == marker.as_bytes())
        .ok_or_else(|| anyhow::anyhow!("marker not stored in archive"))?;
    for b in &mut bytes[at..at + marker.len()] {
        *b ^= 0x5a;
    }
    std::fs::write(archive_path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_pack_then_unpack() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("db_x__tables.csv");
        let b = dir.path().join("db_x__columns.csv");
        fs::write(&a, "owner|table_name\nHR|EMP\n")?;
        fs::write(&b, "owner|column_name\n")?;

        let archive = dir.path().join("pg-extract-db.zip");
        pack(&archive, &[a.clone(), b.clone()])?;
        assert_eq!(
            list_entries(&archive)?,
            vec!["db_x__columns.csv", "db_x__tables.csv"]
        );

        let out = dir.path().join("out");
        fs::create_dir_all(&out)?;
        let files = unpack(&archive, &out)?;
        assert_eq!(files.len(), 2);
        assert_eq!(
            fs::read_to_string(out.join("db_x__tables.csv"))?,
            "owner|table_name\nHR|EMP\n"
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_archive() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, "definitely not a zip")?;
        let err = unpack(&archive, dir.path());
        assert!(matches!(
            err,
            Err(InfrastructureError::ArchiveCorruption { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_checksum_failure_leaves_destination_untouched() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join("pg-extract-x.zip");
        write_archive_with_bad_checksum(
            &archive,
            ("src_x__aaa.csv", "pkey|name\nx|A1\nx|A2\n"),
            ("src_x__bbb.csv", "pkey|name\nx|BROKENMARKER\n"),
            "BROKENMARKER",
        )?;
        // The central directory still reads fine.
        assert_eq!(list_entries(&archive)?.len(), 2);

        let out = dir.path().join("out");
        fs::create_dir_all(&out)?;
        let err = unpack(&archive, &out);
        assert!(matches!(
            err,
            Err(InfrastructureError::ArchiveCorruption { .. })
        ));
        assert_eq!(fs::read_dir(&out)?.count(), 0);
        Ok(())
    }
}
