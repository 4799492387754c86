use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` (and parents) unless it already exists as a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(_) => fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Filesystem collaborator used by the exporter.
pub trait TextWriter: Send + Sync {
    /// Writes `content` to `{dir}/{filename}` and returns the final path.
    fn write_text(&self, dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError>;
}

/// Writes a temp file next to the target and renames it into place, so
/// readers never see a half-written export.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomicFileWriter;

impl TextWriter for AtomicFileWriter {
    fn write_text(&self, dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(dir)?;

        let target = dir.join(filename);
        let write_err = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
        staged.write_all(content.as_bytes()).map_err(write_err)?;
        staged.as_file_mut().sync_all().map_err(write_err)?;

        // Windows refuses to rename over an existing file.
        if target.exists() {
            fs::remove_file(&target).map_err(write_err)?;
        }
        staged.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}
