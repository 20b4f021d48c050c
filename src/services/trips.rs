use std::sync::Arc;

use tracing::{info, warn};

use crate::{error::AppError, models::trip::Trip, services::storage::TripStore};

/// Outcome of persisting after a mutation. The in-memory change stands either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Unsaved(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// Ordered, in-memory trip list with a persisted mirror.
pub struct TripRepository {
    trips: Vec<Trip>,
    store: Arc<dyn TripStore>,
    save_warning: Option<String>,
}

impl TripRepository {
    /// Loads the persisted list once.
    pub async fn open(store: Arc<dyn TripStore>) -> Self {
        let trips = store.load().await;
        info!("trip repository opened with {} trips", trips.len());
        Self {
            trips,
            store,
            save_warning: None,
        }
    }

    pub fn all(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Trip, AppError> {
        self.trips.get(index).ok_or(AppError::IndexOutOfBounds {
            index,
            len: self.trips.len(),
        })
    }

    /// Reason the last save failed, cleared by the next successful save.
    pub fn save_warning(&self) -> Option<&str> {
        self.save_warning.as_deref()
    }

    pub async fn append(&mut self, trip: Trip) -> SaveStatus {
        self.trips.push(trip);
        self.persist().await
    }

    /// Applies `mutator` to the trip at `index`. If the mutator fails, the
    /// list is left as it was and nothing is saved.
    pub async fn update_at<F>(&mut self, index: usize, mutator: F) -> Result<SaveStatus, AppError>
    where
        F: FnOnce(&mut Trip) -> Result<(), AppError>,
    {
        let len = self.trips.len();
        let trip = self
            .trips
            .get_mut(index)
            .ok_or(AppError::IndexOutOfBounds { index, len })?;
        mutator(trip)?;
        Ok(self.persist().await)
    }

    async fn persist(&mut self) -> SaveStatus {
        match self.store.save(&self.trips).await {
            Ok(()) => {
                self.save_warning = None;
                SaveStatus::Saved
            }
            Err(err) => {
                let reason = err.to_string();
                warn!("trip list not persisted: {reason}");
                self.save_warning = Some(reason.clone());
                SaveStatus::Unsaved(reason)
            }
        }
    }
}
