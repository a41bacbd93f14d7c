use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::assessment::domain::recording_store::RecordingStore;
use crate::shared::constants::DEFAULT_RECORDING_EXTENSION;

#[derive(Error, Debug)]
pub enum RecordingStoreError {
    #[error("failed to create upload directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stores recordings as `<8 hex chars><ext>` inside an upload directory.
#[derive(Clone, Debug)]
pub struct FileRecordingStore {
    dir: PathBuf,
}

impl FileRecordingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save_bytes(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<PathBuf, RecordingStoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| RecordingStoreError::CreateDir {
            path: self.dir.clone(),
            source: e,
        })?;

        let id = Uuid::new_v4().simple().to_string();
        let path = self
            .dir
            .join(format!("{}{}", &id[..8], extension_of(file_name)));
        fs::write(&path, bytes).map_err(|e| RecordingStoreError::Write {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Saved recording ({} bytes) to {}", bytes.len(), path.display());
        Ok(path)
    }
}

impl RecordingStore for FileRecordingStore {
    fn save(
        &self,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(self.save_bytes(file_name, bytes)?)
    }
}

/// Extension of the client file name including the dot, or `.webm`.
fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_RECORDING_EXTENSION.to_string())
}
