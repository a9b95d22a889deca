//! Cheaper-nearby search
//!
//! - Planner: derives the default-area and ring queries from a search
//! - Benchmark: median price and cheaper-than filtering
//! - Service: runs a search against a listing store

pub mod benchmark;
pub mod planner;
pub mod service;

pub use benchmark::{compute_median, filter_cheaper};
pub use planner::{plan_inner_query, plan_outer_query};
pub use service::CheaperNearbyService;
