//! Listing store module
//!
//! The search core only needs one capability from storage: find listings
//! within a distance of a point, optionally outside an inner exclusion
//! radius and matching attribute predicates. Backends:
//! - In-memory store seeded from a JSON file
//! - SQLite store with a bounding-box prefilter

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::Result;
use crate::models::{GeoPoint, Listing};

pub use memory::MemoryListingStore;
pub use sqlite::SqliteListingStore;

/// Attribute predicates a store evaluates alongside the distance test
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePredicates {
    pub min_price: Option<f64>,
    pub min_beds: Option<u32>,
    pub min_baths: Option<f64>,
    pub property_type: Option<String>,
}

impl AttributePredicates {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Lower bounds are never satisfied by a missing attribute.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(min_price) = self.min_price {
            if listing.price < min_price {
                return false;
            }
        }
        if let Some(min_beds) = self.min_beds {
            if !listing.bedrooms.is_some_and(|beds| beds >= min_beds) {
                return false;
            }
        }
        if let Some(min_baths) = self.min_baths {
            if !listing.bathrooms.is_some_and(|baths| baths >= min_baths) {
                return false;
            }
        }
        if let Some(property_type) = &self.property_type {
            if listing.property_type.as_deref() != Some(property_type.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Distance-bounded point query against the listing store
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQuery {
    pub center: GeoPoint,
    pub max_distance_meters: f64,
    /// Listings at or within this distance are left out (annulus queries)
    pub exclude_within_meters: Option<f64>,
    pub predicates: AttributePredicates,
}

impl SpatialQuery {
    #[must_use]
    pub fn within(center: GeoPoint, max_distance_meters: f64) -> Self {
        Self {
            center,
            max_distance_meters,
            exclude_within_meters: None,
            predicates: AttributePredicates::default(),
        }
    }

    #[must_use]
    pub fn excluding_within(mut self, exclude_within_meters: f64) -> Self {
        self.exclude_within_meters = Some(exclude_within_meters);
        self
    }

    #[must_use]
    pub fn with_predicates(mut self, predicates: AttributePredicates) -> Self {
        self.predicates = predicates;
        self
    }

    /// Geometric membership for a given distance from the center.
    ///
    /// Inclusion and exclusion share the same `<=` test, so an inner query
    /// of radius r and an annulus excluding r never return the same point.
    #[must_use]
    pub fn contains_distance(&self, distance_meters: f64) -> bool {
        distance_meters <= self.max_distance_meters
            && !self
                .exclude_within_meters
                .is_some_and(|exclude| distance_meters <= exclude)
    }
}

/// Read-only access to the listing collection
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Listings matching the query, nearest to the query center first
    async fn query_within_distance(&self, query: &SpatialQuery) -> Result<Vec<Listing>>;
}

/// Apply a query to candidate listings: distance test, predicates, nearest-first ordering.
pub(crate) fn select_nearest<'a, I>(candidates: I, query: &SpatialQuery) -> Vec<Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut hits: Vec<(f64, &Listing)> = candidates
        .into_iter()
        .filter(|listing| query.predicates.matches(listing))
        .map(|listing| (query.center.distance_meters(&listing.location), listing))
        .filter(|(distance, _)| query.contains_distance(*distance))
        .collect();

    // stable, so equidistant listings keep their stored order
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, listing)| listing.clone()).collect()
}
