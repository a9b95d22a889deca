//! SQLite-backed listing store
//!
//! Candidates are narrowed in SQL with a latitude/longitude bounding box and
//! the attribute predicates, then refined with the haversine distance.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use tokio::task;
use tracing::{debug, info};

use super::{ListingStore, SpatialQuery, select_nearest};
use crate::models::{GeoPoint, Listing};
use crate::{HouseFinderError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS listings (
    id            TEXT PRIMARY KEY,
    address       TEXT NOT NULL,
    price         REAL NOT NULL CHECK (price >= 0),
    latitude      REAL NOT NULL,
    longitude     REAL NOT NULL,
    bedrooms      INTEGER,
    bathrooms     REAL,
    sqft          INTEGER,
    property_type TEXT,
    listing_url   TEXT,
    last_updated  TEXT
);
CREATE INDEX IF NOT EXISTS idx_listings_lat_lng ON listings (latitude, longitude);
";

const SELECT_COLUMNS: &str = "SELECT id, address, price, latitude, longitude, bedrooms, bathrooms, \
     sqft, property_type, listing_url, last_updated FROM listings";

/// Mean earth radius used by the haversine distance
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub struct SqliteListingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteListingStore {
    /// Open (or create) the database and make sure the listings schema exists.
    /// `":memory:"` opens a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!("SQLite listing store ready at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    #[cfg(test)]
    fn insert(&self, listing: &Listing) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| HouseFinderError::store("SQLite connection lock poisoned"))?;
        conn.execute(
            "INSERT INTO listings (id, address, price, latitude, longitude, bedrooms, bathrooms, \
             sqft, property_type, listing_url, last_updated) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                listing.id,
                listing.address,
                listing.price,
                listing.location.latitude,
                listing.location.longitude,
                listing.bedrooms,
                listing.bathrooms,
                listing.sqft,
                listing.property_type,
                listing.listing_url,
                listing.last_updated,
            ],
        )?;
        Ok(())
    }
}

/// Latitude/longitude box enclosing every point within `distance_meters` of `center`
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundingBox {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl BoundingBox {
    fn around(center: GeoPoint, distance_meters: f64) -> Self {
        // slightly enlarged so float error never drops a boundary point
        let angular = (distance_meters / EARTH_RADIUS_METERS) * 1.000_1;
        let lat = center.latitude.to_radians();
        let min_lat = lat - angular;
        let max_lat = lat + angular;

        let half_pi = std::f64::consts::FRAC_PI_2;
        if min_lat <= -half_pi || max_lat >= half_pi || angular >= half_pi {
            // pole inside the circle: every longitude qualifies
            return Self {
                min_lat: min_lat.max(-half_pi).to_degrees(),
                max_lat: max_lat.min(half_pi).to_degrees(),
                min_lng: -180.0,
                max_lng: 180.0,
            };
        }

        let delta_lng = (angular.sin() / lat.cos()).asin().to_degrees();
        let (mut min_lng, mut max_lng) = (center.longitude - delta_lng, center.longitude + delta_lng);
        if min_lng < -180.0 || max_lng > 180.0 {
            // crosses the antimeridian; fall back to the full longitude band
            min_lng = -180.0;
            max_lng = 180.0;
        }

        Self {
            min_lat: min_lat.to_degrees(),
            max_lat: max_lat.to_degrees(),
            min_lng,
            max_lng,
        }
    }
}

fn build_select(query: &SpatialQuery) -> (String, Vec<Value>) {
    let bbox = BoundingBox::around(query.center, query.max_distance_meters);
    let mut sql = format!("{SELECT_COLUMNS} WHERE latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?");
    let mut params = vec![
        Value::Real(bbox.min_lat),
        Value::Real(bbox.max_lat),
        Value::Real(bbox.min_lng),
        Value::Real(bbox.max_lng),
    ];

    let predicates = &query.predicates;
    if let Some(min_price) = predicates.min_price {
        sql.push_str(" AND price >= ?");
        params.push(Value::Real(min_price));
    }
    if let Some(min_beds) = predicates.min_beds {
        sql.push_str(" AND bedrooms >= ?");
        params.push(Value::Integer(i64::from(min_beds)));
    }
    if let Some(min_baths) = predicates.min_baths {
        sql.push_str(" AND bathrooms >= ?");
        params.push(Value::Real(min_baths));
    }
    if let Some(property_type) = &predicates.property_type {
        sql.push_str(" AND property_type = ?");
        params.push(Value::Text(property_type.clone()));
    }
    sql.push_str(" ORDER BY rowid");

    (sql, params)
}

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get(0)?,
        address: row.get(1)?,
        price: row.get(2)?,
        location: GeoPoint::new(row.get(3)?, row.get(4)?),
        bedrooms: row.get(5)?,
        bathrooms: row.get(6)?,
        sqft: row.get(7)?,
        property_type: row.get(8)?,
        listing_url: row.get(9)?,
        last_updated: row.get(10)?,
    })
}

fn run_query(conn: &Mutex<Connection>, query: &SpatialQuery) -> Result<Vec<Listing>> {
    let conn = conn
        .lock()
        .map_err(|_| HouseFinderError::store("SQLite connection lock poisoned"))?;
    let (sql, params) = build_select(query);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params), row_to_listing)?;

    let mut candidates = Vec::new();
    for row in rows {
        candidates.push(row?);
    }

    let hits = select_nearest(&candidates, query);
    debug!(
        "SQLite store refined {} bounding-box candidates to {} listings",
        candidates.len(),
        hits.len()
    );
    Ok(hits)
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn query_within_distance(&self, query: &SpatialQuery) -> Result<Vec<Listing>> {
        let conn = Arc::clone(&self.conn);
        let query = query.clone();
        task::spawn_blocking(move || run_query(&conn, &query))
            .await
            .map_err(|e| HouseFinderError::store(format!("SQLite query task failed: {e}")))?
    }
}
