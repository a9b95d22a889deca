//! In-memory listing store

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{ListingStore, SpatialQuery, select_nearest};
use crate::models::Listing;
use crate::{HouseFinderError, Result};

/// Fixed set of listings held in memory. Backs tests and small deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryListingStore {
    listings: Vec<Listing>,
}

impl MemoryListingStore {
    #[must_use]
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Load a JSON array of listings
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let listings: Vec<Listing> = serde_json::from_str(&raw).map_err(|e| {
            HouseFinderError::store(format!(
                "Failed to parse listings from {}: {e}",
                path.display()
            ))
        })?;

        info!("Loaded {} listings from {}", listings.len(), path.display());
        Ok(Self::new(listings))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn query_within_distance(&self, query: &SpatialQuery) -> Result<Vec<Listing>> {
        let hits = select_nearest(&self.listings, query);
        debug!(
            "Memory store matched {} of {} listings",
            hits.len(),
            self.listings.len()
        );
        Ok(hits)
    }
}
