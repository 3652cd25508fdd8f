use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("export directory missing or not writable: {0}")]
    ExportDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Artifact name for an export generated at `generated_at_millis` (Unix epoch).
pub fn export_file_name(generated_at_millis: i64) -> String {
    format!("scrubbed_base_{generated_at_millis}.csv")
}

/// Create the export directory if missing and check that it accepts files.
pub fn ensure_export_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ExportDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
    Ok(())
}

/// Writes export artifacts into one directory. A file only appears once complete.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, payload: &str, generated_at_millis: i64) -> Result<PathBuf, PersistError> {
        ensure_export_dir(&self.dir)?;

        let target = self.dir.join(export_file_name(generated_at_millis));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(payload.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
