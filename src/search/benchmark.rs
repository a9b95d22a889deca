//! Benchmark price and cheaper-than filtering

use crate::models::{Listing, SearchFilters};

/// True median of `prices`; `None` when empty.
///
/// Odd length yields the middle element, even length the mean of the two
/// middle elements.
#[must_use]
pub fn compute_median(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Keep ring listings strictly cheaper than the benchmark, then those at or
/// below `maxPrice` when set. Input order is preserved.
#[must_use]
pub fn filter_cheaper(
    listings: Vec<Listing>,
    benchmark: Option<f64>,
    filters: &SearchFilters,
) -> Vec<Listing> {
    let Some(benchmark) = benchmark else {
        return Vec::new();
    };

    let cheaper = listings.into_iter().filter(|listing| listing.price < benchmark);

    match filters.max_price {
        Some(max_price) => cheaper.filter(|listing| listing.price <= max_price).collect(),
        None => cheaper.collect(),
    }
}
