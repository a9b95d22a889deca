//! Geo query planning
//!
//! Turns a search into the two store queries it needs: the default-area
//! disk and the surrounding ring.

use crate::models::SearchRequest;
use crate::store::{AttributePredicates, SpatialQuery};

/// All listings within the inner radius, unfiltered so the benchmark
/// reflects the whole default area.
#[must_use]
pub fn plan_inner_query(request: &SearchRequest) -> SpatialQuery {
    SpatialQuery::within(request.center(), request.inner_radius_meters())
}

/// Listings in the ring between the inner radius and `inner + proximity`.
///
/// The exclusion radius is the inner query's radius, so the two result sets
/// partition the outer disk. `maxPrice` stays out of the predicates: it is
/// applied after the benchmark cut.
#[must_use]
pub fn plan_outer_query(request: &SearchRequest) -> SpatialQuery {
    let filters = request.filters();
    let predicates = AttributePredicates {
        min_price: filters.min_price,
        min_beds: filters.min_beds,
        min_baths: filters.min_baths,
        property_type: filters.property_type.clone(),
    };

    SpatialQuery::within(request.center(), request.outer_radius_meters())
        .excluding_within(request.inner_radius_meters())
        .with_predicates(predicates)
}
