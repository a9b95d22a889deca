//! House finder - find listings priced below the median of a chosen area
//!
//! A user picks a point and a "default area" circle around it. The service
//! takes the median price of the listings inside that circle as a benchmark
//! and returns the listings in the surrounding ring that are cheaper.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::HouseFinderConfig;
pub use error::HouseFinderError;
pub use models::{GeoPoint, Listing, SearchFilters, SearchRequest, SearchResult};
pub use search::CheaperNearbyService;
pub use store::{ListingStore, MemoryListingStore, SqliteListingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HouseFinderError>;
