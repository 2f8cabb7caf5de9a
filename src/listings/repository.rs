use crate::error::{ListingError, StoreError};
use crate::gateways::PropertyStore;
use crate::models::{Property, PropertyDraft, PropertyPatch};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Listing access on top of a [`PropertyStore`]
///
/// Holds no cache: every call goes to the store, so two sequential calls may
/// observe different snapshots. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct ListingRepository {
    store: Arc<dyn PropertyStore>,
    timeout: Duration,
}

impl ListingRepository {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
        wrap: fn(StoreError) -> ListingError,
    ) -> Result<T, ListingError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(wrap),
            Err(_) => {
                warn!(operation, store = self.store.store_name(), timeout = ?self.timeout, "Store call timed out");
                Err(ListingError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }

    /// The whole collection
    pub async fn fetch_all(&self) -> Result<Vec<Property>, ListingError> {
        let listings = self
            .bounded("fetch_all", self.store.select_all(), ListingError::Read)
            .await?;
        debug!(count = listings.len(), "Fetched all listings");
        Ok(listings)
    }

    /// Like [`fetch_all`](Self::fetch_all), but a failure reads as an empty collection
    pub async fn fetch_all_or_empty(&self) -> Vec<Property> {
        self.fetch_all().await.unwrap_or_else(|e| {
            warn!(error = %e, "Showing no listings after fetch failure");
            Vec::new()
        })
    }

    /// `Ok(None)` when no listing has this id
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<Property>, ListingError> {
        self.bounded("fetch_by_id", self.store.select_by_id(id), ListingError::Read)
            .await
    }

    /// Like [`fetch_by_id`](Self::fetch_by_id), but a failure reads as absent
    pub async fn fetch_by_id_or_none(&self, id: &str) -> Option<Property> {
        self.fetch_by_id(id).await.unwrap_or_else(|e| {
            warn!(id, error = %e, "Treating listing as absent after fetch failure");
            None
        })
    }

    pub async fn create(&self, draft: &PropertyDraft) -> Result<Property, ListingError> {
        let created = self
            .bounded("create", self.store.insert(draft), ListingError::Write)
            .await?;
        info!(id = %created.id, title = %created.title, "Listing created");
        Ok(created)
    }

    /// Overwrite only the fields present in `patch`
    pub async fn update(&self, id: &str, patch: &PropertyPatch) -> Result<Property, ListingError> {
        let updated = self
            .bounded("update", self.store.update(id, patch), ListingError::Write)
            .await?
            .ok_or_else(|| ListingError::NotFound(id.to_string()))?;
        info!(id, "Listing updated");
        Ok(updated)
    }

    /// Whether a listing was deleted; failures are logged and read as `false`
    pub async fn remove(&self, id: &str) -> bool {
        match self
            .bounded("remove", self.store.delete(id), ListingError::Write)
            .await
        {
            Ok(removed) => {
                info!(id, removed, "Listing removal");
                removed
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to delete listing");
                false
            }
        }
    }
}
