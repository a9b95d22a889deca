//! Cheaper-nearby search service
//!
//! Runs one search end to end: default-area query, median benchmark, ring
//! query, benchmark and price filtering.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::benchmark::{compute_median, filter_cheaper};
use super::planner::{plan_inner_query, plan_outer_query};
use crate::Result;
use crate::models::{BenchmarkResult, Listing, SearchRequest, SearchResult};
use crate::store::ListingStore;

pub const EMPTY_AREA_MESSAGE: &str =
    "No houses found in the selected default area to calculate benchmark.";

/// Stateless search over an explicitly supplied listing store
#[derive(Clone)]
pub struct CheaperNearbyService {
    store: Arc<dyn ListingStore>,
}

impl CheaperNearbyService {
    #[must_use]
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Median price of the default area together with the listings it was computed from
    pub async fn benchmark(&self, request: &SearchRequest) -> Result<(BenchmarkResult, Vec<Listing>)> {
        let inner = self
            .store
            .query_within_distance(&plan_inner_query(request))
            .await?;

        let prices: Vec<f64> = inner.iter().map(|listing| listing.price).collect();
        let benchmark = BenchmarkResult {
            benchmark_price: compute_median(&prices),
            inner_count: inner.len(),
        };
        Ok((benchmark, inner))
    }

    /// Find ring listings priced below the default area's median
    #[instrument(
        name = "find_cheaper_nearby",
        skip(self, request),
        fields(
            center = %request.center().format_coordinates(),
            radius = request.inner_radius_meters(),
            proximity = request.proximity_meters(),
        )
    )]
    pub async fn find_cheaper_nearby(&self, request: &SearchRequest) -> Result<SearchResult> {
        let (benchmark, inner) = self.benchmark(request).await?;

        let Some(benchmark_price) = benchmark.benchmark_price else {
            info!("No listings in default area, skipping ring query");
            return Ok(SearchResult {
                benchmark_price: None,
                inner_count: 0,
                listings: Vec::new(),
                message: Some(EMPTY_AREA_MESSAGE.to_string()),
            });
        };
        debug!(
            "Benchmark {} from {} default-area listings",
            benchmark_price, benchmark.inner_count
        );

        let ring = self
            .store
            .query_within_distance(&plan_outer_query(request))
            .await?;

        // set difference by id, whatever the store did with the exclusion radius
        let inner_ids: HashSet<&str> = inner.iter().map(|listing| listing.id.as_str()).collect();
        let ring_count = ring.len();
        let ring: Vec<Listing> = ring
            .into_iter()
            .filter(|listing| !inner_ids.contains(listing.id.as_str()))
            .collect();

        let listings = filter_cheaper(ring, Some(benchmark_price), request.filters());
        info!(
            "Found {} cheaper listings out of {} in the ring (benchmark {})",
            listings.len(),
            ring_count,
            benchmark_price
        );

        Ok(SearchResult {
            benchmark_price: Some(benchmark_price),
            inner_count: benchmark.inner_count,
            listings,
            message: None,
        })
    }
}
