//! Geographic point model and great-circle distance

use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees.
///
/// Stored and transmitted as a GeoJSON point, `{"type": "Point", "coordinates": [lng, lat]}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates finite and inside their valid ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance to another point in meters
    #[must_use]
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        ) * 1000.0
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = String;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(format!("unsupported geometry type '{}'", value.kind));
        }
        let [longitude, latitude] = value.coordinates;
        Ok(GeoPoint::new(latitude, longitude))
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(value: GeoPoint) -> Self {
        GeoJsonPoint {
            kind: "Point".to_string(),
            coordinates: [value.longitude, value.latitude],
        }
    }
}
