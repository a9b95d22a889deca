//! Wire types for the houses API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, Listing, SearchFilters, SearchRequest, SearchResult};
use crate::{HouseFinderError, Result};

const SUPPORTED_AREA_TYPE: &str = "Circle";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiLatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiDefaultArea {
    #[serde(rename = "type")]
    pub area_type: Option<String>,
    pub center: Option<ApiLatLng>,
    /// Radius in meters
    pub radius: Option<f64>,
}

/// Body of `POST /houses/find-cheaper-nearby`. Every field is optional here
/// so that missing ones are reported by name rather than as a parse failure.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindCheaperNearbyBody {
    pub default_area: Option<ApiDefaultArea>,
    /// Width of the search ring in meters
    pub search_proximity: Option<f64>,
    pub filters: Option<SearchFilters>,
}

impl TryFrom<FindCheaperNearbyBody> for SearchRequest {
    type Error = HouseFinderError;

    fn try_from(body: FindCheaperNearbyBody) -> Result<Self> {
        let area = body.default_area.unwrap_or_default();
        let center = area.center.unwrap_or_default();

        let mut missing = Vec::new();
        if center.lat.is_none() {
            missing.push("defaultArea.center.lat");
        }
        if center.lng.is_none() {
            missing.push("defaultArea.center.lng");
        }
        if area.radius.is_none() {
            missing.push("defaultArea.radius");
        }
        if body.search_proximity.is_none() {
            missing.push("searchProximity");
        }

        let (Some(lat), Some(lng), Some(radius), Some(proximity)) =
            (center.lat, center.lng, area.radius, body.search_proximity)
        else {
            return Err(HouseFinderError::validation(format!(
                "Missing or invalid required parameters: {}",
                missing.join(", ")
            )));
        };

        match area.area_type.as_deref() {
            Some(SUPPORTED_AREA_TYPE) => {}
            Some(other) => {
                return Err(HouseFinderError::validation(format!(
                    "Unsupported defaultArea type '{other}': only {SUPPORTED_AREA_TYPE} is supported"
                )));
            }
            None => {
                return Err(HouseFinderError::validation(format!(
                    "Missing defaultArea.type: only {SUPPORTED_AREA_TYPE} is supported"
                )));
            }
        }

        SearchRequest::new(
            GeoPoint::new(lat, lng),
            radius,
            proximity,
            body.filters.unwrap_or_default(),
        )
    }
}

/// Listing as returned to the map client
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListing {
    pub id: String,
    pub price: f64,
    pub address: String,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<Listing> for ApiListing {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            price: listing.price,
            address: listing.address,
            location: listing.location,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            sqft: listing.sqft,
            property_type: listing.property_type,
            listing_url: listing.listing_url,
            last_updated: listing.last_updated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindCheaperNearbyResponse {
    pub success: bool,
    pub benchmark_price: Option<f64>,
    pub houses_in_area_count: usize,
    pub cheaper_nearby_houses: Vec<ApiListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SearchResult> for FindCheaperNearbyResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            success: true,
            benchmark_price: result.benchmark_price,
            houses_in_area_count: result.inner_count,
            cheaper_nearby_houses: result.listings.into_iter().map(ApiListing::from).collect(),
            message: result.message,
        }
    }
}

/// Failure envelope shared by every API error
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: String,
    /// Internal detail, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
