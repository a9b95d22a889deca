//! Residential listing model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A house listing as held by the listing store. Read-only to the search core.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub address: String,
    pub price: f64,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Listing {
    /// Listing with only the required attributes set
    #[must_use]
    pub fn new(id: impl Into<String>, address: impl Into<String>, price: f64, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            price,
            location,
            bedrooms: None,
            bathrooms: None,
            sqft: None,
            property_type: None,
            listing_url: None,
            last_updated: None,
        }
    }
}
