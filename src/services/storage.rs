use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::{error::AppError, models::trip::Trip};

/// Durable mirror of the trip list.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Returns the stored list, or an empty one if nothing usable is stored.
    async fn load(&self) -> Vec<Trip>;

    /// Overwrites the stored list with `trips`.
    async fn save(&self, trips: &[Trip]) -> Result<(), AppError>;
}

/// Trip list kept as a single JSON document on disk.
#[derive(Clone)]
pub struct JsonTripStore {
    path: Arc<PathBuf>,
    quota_bytes: Option<usize>,
}

impl JsonTripStore {
    pub fn new(path: PathBuf, quota_bytes: Option<usize>) -> Self {
        Self {
            path: Arc::new(path),
            quota_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_slot(&self) -> Result<Vec<Trip>, AppError> {
        if !fs::try_exists(self.path()).await? {
            return Ok(Vec::new());
        }
        let raw = fs::read(self.path()).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let trips: Vec<Trip> = serde_json::from_slice(&raw)?;
        Ok(trips)
    }
}

#[async_trait]
impl TripStore for JsonTripStore {
    async fn load(&self) -> Vec<Trip> {
        match self.read_slot().await {
            Ok(trips) => {
                debug!("loaded {} trips from {}", trips.len(), self.path().display());
                trips
            }
            Err(err) => {
                warn!(
                    "discarding unreadable trip slot {}: {err}",
                    self.path().display()
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, trips: &[Trip]) -> Result<(), AppError> {
        let data = serde_json::to_vec_pretty(trips)?;
        if let Some(quota) = self.quota_bytes {
            if data.len() > quota {
                return Err(AppError::StorageFull {
                    needed: data.len(),
                    quota,
                });
            }
        }
        if let Some(parent) = self.path().parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path().with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, self.path()).await?;
        Ok(())
    }
}
