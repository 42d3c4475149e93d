use std::sync::Arc;

use crate::data::{CatalogSnapshot, SnapshotStore, TableSource};
use crate::error::{AppError, AppResult};
use crate::services::Recommender;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotStore,
    pub source: Arc<dyn TableSource>,
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(
        snapshot: CatalogSnapshot,
        source: Arc<dyn TableSource>,
        recommender: Recommender,
    ) -> Self {
        Self {
            snapshots: SnapshotStore::new(snapshot),
            source,
            recommender,
        }
    }

    /// Rebuilds the snapshot from the source and swaps it in
    ///
    /// On failure the snapshot in service is left untouched.
    pub async fn reload(&self) -> AppResult<Arc<CatalogSnapshot>> {
        tracing::info!(source = %self.source.describe(), "Reloading catalog");

        let raw = self.source.load().await?;
        let snapshot = tokio::task::spawn_blocking(move || CatalogSnapshot::build(raw))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.snapshots.replace(snapshot).await;
        Ok(self.snapshots.current().await)
    }
}
