use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::settings::Settings;
use super::traits::DataSource;

/// Reads both resources from a data directory on disk (native only).
///
/// Same layout as the published site, so a checkout of the data repository
/// can be pointed at directly.
pub struct FileSource {
    root: PathBuf,
    settings: Settings,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            root: root.into(),
            settings: settings.clone(),
        }
    }

    pub fn series_file(&self) -> PathBuf {
        self.root.join(&self.settings.series_path)
    }

    pub fn movers_file(&self, date: NaiveDate) -> PathBuf {
        self.root.join(self.settings.movers_path(date))
    }

    fn io_error(path: &Path, e: io::Error) -> CoreError {
        CoreError::FileIO(format!("{}: {e}", path.display()))
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn name(&self) -> &str {
        "File"
    }

    async fn fetch_series(&self) -> Result<Value, CoreError> {
        let path = self.series_file();
        let bytes = std::fs::read(&path).map_err(|e| Self::io_error(&path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_movers(&self, date: NaiveDate) -> Result<Option<Value>, CoreError> {
        let path = self.movers_file(date);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&path, e)),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
