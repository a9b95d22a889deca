//! Search request and result models

use serde::{Deserialize, Serialize};

use super::{GeoPoint, Listing};
use crate::{HouseFinderError, Result};

/// Optional user filters. Zero and empty values mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_beds: Option<u32>,
    pub min_baths: Option<f64>,
    pub property_type: Option<String>,
}

impl SearchFilters {
    /// Drop zero bounds and an empty property type, which place no restriction
    #[must_use]
    pub fn normalized(self) -> Self {
        let non_zero = |value: Option<f64>| value.filter(|v| *v != 0.0);
        Self {
            min_price: non_zero(self.min_price),
            max_price: non_zero(self.max_price),
            min_beds: self.min_beds.filter(|beds| *beds != 0),
            min_baths: non_zero(self.min_baths),
            property_type: self.property_type.filter(|kind| !kind.trim().is_empty()),
        }
    }

    /// Names of filters holding negative or non-finite values
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("filters.minPrice", self.min_price),
            ("filters.maxPrice", self.max_price),
            ("filters.minBaths", self.min_baths),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| !v.is_finite() || v < 0.0))
            .map(|(name, _)| name)
            .collect()
    }
}

/// A validated search: a circle around `center` plus a surrounding ring of width `proximity_meters`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    center: GeoPoint,
    inner_radius_meters: f64,
    proximity_meters: f64,
    filters: SearchFilters,
}

impl SearchRequest {
    /// Build a search, rejecting non-positive distances, bad coordinates and invalid filters.
    pub fn new(
        center: GeoPoint,
        inner_radius_meters: f64,
        proximity_meters: f64,
        filters: SearchFilters,
    ) -> Result<Self> {
        let mut problems = Vec::new();
        if !center.is_valid() {
            problems.push(format!(
                "defaultArea.center ({}) is not a valid latitude/longitude",
                center.format_coordinates()
            ));
        }
        if !(inner_radius_meters.is_finite() && inner_radius_meters > 0.0) {
            problems.push("defaultArea.radius must be a positive number of meters".to_string());
        }
        if !(proximity_meters.is_finite() && proximity_meters > 0.0) {
            problems.push("searchProximity must be a positive number of meters".to_string());
        } else if inner_radius_meters.is_finite() && inner_radius_meters > 0.0 {
            let outer_radius = inner_radius_meters + proximity_meters;
            if !(outer_radius.is_finite() && outer_radius > inner_radius_meters) {
                problems.push(
                    "searchProximity is too small to widen defaultArea.radius".to_string(),
                );
            }
        }
        for field in filters.invalid_fields() {
            problems.push(format!("{field} must be a non-negative number"));
        }

        if !problems.is_empty() {
            return Err(HouseFinderError::validation(problems.join("; ")));
        }

        Ok(Self {
            center,
            inner_radius_meters,
            proximity_meters,
            filters: filters.normalized(),
        })
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn inner_radius_meters(&self) -> f64 {
        self.inner_radius_meters
    }

    #[must_use]
    pub fn proximity_meters(&self) -> f64 {
        self.proximity_meters
    }

    /// Radius of the outer disk; always greater than the inner radius
    #[must_use]
    pub fn outer_radius_meters(&self) -> f64 {
        self.inner_radius_meters + self.proximity_meters
    }

    #[must_use]
    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }
}

/// Median price of the default area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkResult {
    pub benchmark_price: Option<f64>,
    pub inner_count: usize,
}

/// Outcome of a cheaper-nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub benchmark_price: Option<f64>,
    pub inner_count: usize,
    /// Qualifying ring listings in store order
    pub listings: Vec<Listing>,
    pub message: Option<String>,
}
