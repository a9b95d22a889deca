//! Data models for the house finder
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic points and great-circle distance
//! - Listing: House listings as read from the store
//! - Search: Search requests, benchmarks and results

pub mod listing;
pub mod location;
pub mod search;

// Re-export all public types for convenient access
pub use listing::Listing;
pub use location::GeoPoint;
pub use search::{BenchmarkResult, SearchFilters, SearchRequest, SearchResult};
