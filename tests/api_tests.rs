//! End-to-end tests for the houses API, driven through the axum router

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use house_finder::config::{RunMode, ServerConfig};
use house_finder::store::SpatialQuery;
use house_finder::{
    CheaperNearbyService, GeoPoint, HouseFinderError, Listing, ListingStore, MemoryListingStore,
    web,
};

const ENDPOINT: &str = "/api/houses/find-cheaper-nearby";

/// Point `meters` east of (0, 0) along the equator
fn east(meters: f64) -> GeoPoint {
    GeoPoint::new(0.0, (meters / 6_371_000.0).to_degrees())
}

fn listing(id: &str, price: f64, meters_east: f64) -> Listing {
    Listing::new(id, format!("{id} Avenue"), price, east(meters_east))
}

/// Wraps a store and counts how many queries reach it
struct CountingStore<S> {
    inner: S,
    queries: AtomicUsize,
}

#[async_trait]
impl<S: ListingStore> ListingStore for CountingStore<S> {
    async fn query_within_distance(
        &self,
        query: &SpatialQuery,
    ) -> house_finder::Result<Vec<Listing>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query_within_distance(query).await
    }
}

struct BrokenStore;

#[async_trait]
impl ListingStore for BrokenStore {
    async fn query_within_distance(
        &self,
        _query: &SpatialQuery,
    ) -> house_finder::Result<Vec<Listing>> {
        Err(HouseFinderError::store("connection refused by 10.0.0.5:27017"))
    }
}

fn app_with(store: Arc<dyn ListingStore>, environment: RunMode) -> Router {
    let config = ServerConfig {
        environment,
        ..ServerConfig::default()
    };
    web::app(&config, CheaperNearbyService::new(store)).unwrap()
}

/// Production app serving the client shell from `static_dir`
fn production_app(static_dir: &std::path::Path) -> Router {
    let config = ServerConfig {
        environment: RunMode::Production,
        static_dir: static_dir.to_string_lossy().into_owned(),
        ..ServerConfig::default()
    };
    web::app(&config, CheaperNearbyService::new(Arc::new(neighbourhood()))).unwrap()
}

fn neighbourhood() -> MemoryListingStore {
    MemoryListingStore::new(vec![
        listing("inner-a", 100_000.0, 200.0),
        listing("inner-b", 200_000.0, 500.0),
        listing("inner-c", 300_000.0, 800.0),
        listing("ring-cheaper", 150_000.0, 1_500.0),
        listing("ring-equal", 200_000.0, 2_000.0),
        listing("ring-dearer", 250_000.0, 2_500.0),
        listing("outside", 50_000.0, 4_000.0),
    ])
}

fn search_body(proximity: Value, filters: Value) -> Value {
    json!({
        "defaultArea": {"type": "Circle", "center": {"lat": 0.0, "lng": 0.0}, "radius": 1000},
        "searchProximity": proximity,
        "filters": filters
    })
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn ids(body: &Value) -> Vec<&str> {
    body["cheaperNearbyHouses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|house| house["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_benchmark_is_median_and_cut_is_strict() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);

    let (status, body) = post_json(app, ENDPOINT, search_body(json!(2000), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["benchmarkPrice"].as_f64(), Some(200_000.0));
    assert_eq!(body["housesInAreaCount"], 3);
    assert_eq!(ids(&body), vec!["ring-cheaper"]);

    let house = &body["cheaperNearbyHouses"][0];
    assert_eq!(house["address"], "ring-cheaper Avenue");
    assert_eq!(house["location"]["type"], "Point");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_empty_default_area_is_a_successful_null_benchmark() {
    let store = MemoryListingStore::new(vec![listing("ring-only", 1.0, 1_500.0)]);
    let app = app_with(Arc::new(store), RunMode::Development);

    let (status, body) = post_json(app, ENDPOINT, search_body(json!(2000), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["benchmarkPrice"].is_null());
    assert_eq!(body["housesInAreaCount"], 0);
    assert_eq!(body["cheaperNearbyHouses"], json!([]));
    assert!(body["message"].as_str().unwrap().contains("No houses found"));
}

#[tokio::test]
async fn test_negative_proximity_is_rejected_before_any_query() {
    let store = Arc::new(CountingStore {
        inner: neighbourhood(),
        queries: AtomicUsize::new(0),
    });
    let app = app_with(store.clone(), RunMode::Development);

    let (status, body) = post_json(app, ENDPOINT, search_body(json!(-5), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap().to_lowercase();
    assert!(message.contains("proximity"), "{message}");
    assert_eq!(store.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_max_price_trims_benchmark_passing_listings() {
    let store = MemoryListingStore::new(vec![
        listing("inner", 500_000.0, 100.0),
        listing("ring-1", 120_000.0, 1_200.0),
        listing("ring-2", 300_000.0, 1_400.0),
        listing("ring-3", 200_000.0, 1_600.0),
        listing("ring-4", 450_000.0, 1_800.0),
    ]);
    let app = app_with(Arc::new(store), RunMode::Development);

    let (status, body) = post_json(
        app,
        ENDPOINT,
        search_body(json!(2000), json!({"maxPrice": 200000})).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["ring-1", "ring-3"]);
    for house in body["cheaperNearbyHouses"].as_array().unwrap() {
        assert!(house["price"].as_f64().unwrap() <= 200_000.0);
    }
}

#[tokio::test]
async fn test_ring_filters_do_not_change_the_benchmark() {
    let mut condo = listing("ring-condo", 150_000.0, 1_500.0);
    condo.property_type = Some("Condo".to_string());
    let mut house = listing("ring-house", 140_000.0, 1_700.0);
    house.property_type = Some("House".to_string());
    let store = MemoryListingStore::new(vec![
        listing("inner-a", 100_000.0, 200.0),
        listing("inner-b", 300_000.0, 400.0),
        condo,
        house,
    ]);
    let app = app_with(Arc::new(store), RunMode::Development);

    let (_, body) = post_json(
        app,
        ENDPOINT,
        search_body(json!(2000), json!({"propertyType": "Condo", "minPrice": 100000})).to_string(),
    )
    .await;

    assert_eq!(body["benchmarkPrice"].as_f64(), Some(200_000.0));
    assert_eq!(body["housesInAreaCount"], 2);
    assert_eq!(ids(&body), vec!["ring-condo"]);
}

#[tokio::test]
async fn test_unsupported_area_type_is_a_client_error() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);
    let body = json!({
        "defaultArea": {"type": "Polygon", "center": {"lat": 0.0, "lng": 0.0}, "radius": 1000},
        "searchProximity": 2000
    });

    let (status, body) = post_json(app, ENDPOINT, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Circle"));
}

#[tokio::test]
async fn test_malformed_json_uses_the_error_envelope() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);

    let (status, body) = post_json(app, ENDPOINT, "{\"defaultArea\": ".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_wrongly_typed_field_uses_the_error_envelope() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);

    let (status, body) =
        post_json(app, ENDPOINT, search_body(json!("far"), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_store_failure_detail_is_hidden_in_production() {
    let app = app_with(Arc::new(BrokenStore), RunMode::Production);

    let (status, body) = post_json(app, ENDPOINT, search_body(json!(2000), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server Error");
    assert!(body.get("error").is_none());
    assert!(body.get("cheaperNearbyHouses").is_none());
}

#[tokio::test]
async fn test_store_failure_detail_is_shown_in_development() {
    let app = app_with(Arc::new(BrokenStore), RunMode::Development);

    let (status, body) = post_json(app, ENDPOINT, search_body(json!(2000), json!({})).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server Error");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_unknown_api_route_is_a_json_not_found() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);

    let (status, body) = post_json(app, "/api/houses/unknown", "{}".to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API Endpoint Not Found");
}

#[tokio::test]
async fn test_root_reports_running_in_development() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"API Running...");
}

#[tokio::test]
async fn test_zero_and_empty_filters_are_ignored() {
    for filters in [
        json!({"minBeds": 0}),
        json!({"minBaths": 0}),
        json!({"maxPrice": 0}),
        json!({"minPrice": 0}),
        json!({"propertyType": ""}),
    ] {
        let store = MemoryListingStore::new(vec![
            listing("inner", 1_000.0, 100.0),
            listing("ring-bare", 500.0, 1_500.0),
        ]);
        let app = app_with(Arc::new(store), RunMode::Development);

        let (status, body) =
            post_json(app, ENDPOINT, search_body(json!(2000), filters.clone()).to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["ring-bare"], "filters {filters}");
    }
}

#[tokio::test]
async fn test_proximity_too_small_to_widen_the_radius_is_rejected() {
    let app = app_with(Arc::new(neighbourhood()), RunMode::Development);
    let body = json!({
        "defaultArea": {"type": "Circle", "center": {"lat": 0.0, "lng": 0.0}, "radius": 1e17},
        "searchProximity": 1
    });

    let (status, body) = post_json(app, ENDPOINT, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("searchProximity"));
}

#[tokio::test]
async fn test_oversized_body_uses_the_error_envelope() {
    let config = ServerConfig {
        body_limit_kb: 1,
        ..ServerConfig::default()
    };
    let app = web::app(&config, CheaperNearbyService::new(Arc::new(neighbourhood()))).unwrap();
    let padding = "x".repeat(4 * 1024);
    let mut body = search_body(json!(2000), json!({}));
    body["padding"] = json!(padding);

    let (status, body) = post_json(app, ENDPOINT, body.to_string()).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_production_serves_client_shell_for_deep_links() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>shell</html>").unwrap();

    let response = production_app(static_dir.path())
        .oneshot(
            Request::builder()
                .uri("/map/some-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<html>shell</html>");
}

#[tokio::test]
async fn test_production_unknown_api_route_is_still_a_json_not_found() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>shell</html>").unwrap();

    let (status, body) =
        post_json(production_app(static_dir.path()), "/api/houses/unknown", "{}".to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API Endpoint Not Found");
}
