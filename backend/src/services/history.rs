//! Soil analysis history, persisted as a JSON array in a single file.
//!
//! The file is read once when the store opens and rewritten after every
//! change. Missing or corrupt content means an empty history.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use shared::{AnalysisHistory, AnalysisRecord};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct HistoryStore {
    path: Arc<PathBuf>,
    cache: Arc<RwLock<AnalysisHistory>>,
}

impl HistoryStore {
    /// Open the store, loading whatever the file holds
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let history = match fs::read_to_string(&path).await {
            Ok(raw) => {
                let history = AnalysisHistory::from_json_lenient(&raw);
                if history.is_empty() && !raw.trim().is_empty() && raw.trim() != "[]" {
                    tracing::warn!("Analysis history at {} is unreadable; starting empty", path.display());
                }
                history
            }
            Err(_) => AnalysisHistory::default(),
        };
        tracing::debug!(records = history.len(), "Analysis history loaded");

        Self {
            path: Arc::new(path),
            cache: Arc::new(RwLock::new(history)),
        }
    }

    /// All records, newest first
    pub async fn list(&self) -> Vec<AnalysisRecord> {
        self.cache.read().await.records().to_vec()
    }

    pub async fn get(&self, id: &str) -> AppResult<AnalysisRecord> {
        self.cache
            .read()
            .await
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Analysis record".to_string()))
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Prepend a record and persist the whole history.
    ///
    /// The write lock is held until the file is replaced, so saves never
    /// overlap and the file always holds the latest history.
    pub async fn append(&self, record: AnalysisRecord) -> AppResult<()> {
        let mut history = self.cache.write().await;
        history.prepend(record);
        let json = history
            .to_json()
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        self.save(&json).await
    }

    /// Write to a temp file, flush, then rename over the target
    async fn save(&self, json: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::StorageError(format!("create directory: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::StorageError(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| AppError::StorageError(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| AppError::StorageError(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, self.path.as_ref())
            .await
            .map_err(|e| AppError::StorageError(format!("rename failed: {}", e)))?;
        Ok(())
    }
}
