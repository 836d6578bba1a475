//! Integration tests for FuelRadar API endpoints.
//!
//! These tests verify the full request/response cycle through the HTTP API.
//! The proxy endpoints run against stub upstream servers bound to a random
//! local port, so the real reqwest fetch path is exercised end-to-end.

use axum::{Json, Router, routing::get, routing::post};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::json;

use fuelradar::api::{
    AppState, create_ride, fuel_news, fuel_price, list_rides, nearby_bunks, root, save_ride,
};
use fuelradar::data_sources::{GnewsClient, OverpassClient, PriceSheetClient};
use fuelradar::storage::RideStore;

async fn test_state() -> AppState {
    AppState {
        store: RideStore::connect("sqlite::memory:").await.unwrap(),
        news: GnewsClient::new("test-key"),
        prices: PriceSheetClient::new(),
        overpass: OverpassClient::new(),
    }
}

fn create_test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/", get(root))
        .route("/save-ride", post(save_ride))
        .route("/rides", post(create_ride).get(list_rides))
        .route("/fuel-news", get(fuel_news))
        .route("/fuel-price", get(fuel_price))
        .route("/nearby-bunks", get(nearby_bunks))
        .with_state(state);

    TestServer::new(app).unwrap()
}

/// Serve a stub upstream on a random local port and return its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
async fn test_root_liveness() {
    let server = create_test_server(test_state().await);

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "FuelRadar backend running");
}

// ============================================================================
// Ride persistence
// ============================================================================

#[tokio::test]
async fn test_create_ride_round_trip() {
    let server = create_test_server(test_state().await);

    let before = Utc::now();
    let response = server
        .post("/rides")
        .json(&json!({
            "distance": 120,
            "fuelUsed": 8,
            "mileage": 15
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Ride saved successfully");
    assert_eq!(body["ride"]["distanceKm"], 120.0);
    assert_eq!(body["ride"]["fuelUsedLitres"], 8.0);
    assert_eq!(body["ride"]["mileageKmPerLitre"], 15.0);

    // Date was server-assigned at call time
    let date: chrono::DateTime<Utc> =
        serde_json::from_value(body["ride"]["date"].clone()).unwrap();
    assert!(date >= before - Duration::seconds(1));
    assert!(date <= Utc::now() + Duration::seconds(1));

    // The ride comes back from a ranged listing
    let from = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();
    let to = (Utc::now() + Duration::days(1)).format("%Y-%m-%d").to_string();
    let listed = server.get(&format!("/rides?from={from}&to={to}")).await;
    listed.assert_status_ok();

    let rides: serde_json::Value = listed.json();
    let rides = rides.as_array().unwrap();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0]["distanceKm"], 120.0);
}

#[tokio::test]
async fn test_create_ride_applies_defaults() {
    let server = create_test_server(test_state().await);

    let response = server.post("/rides").json(&json!({})).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["ride"]["distanceKm"], 0.0);
    assert_eq!(body["ride"]["fuelUsedLitres"], 0.0);
    assert_eq!(body["ride"]["mileageKmPerLitre"], 0.0);
    assert!(body["ride"]["date"].is_string());
}

#[tokio::test]
async fn test_create_ride_with_explicit_date() {
    let server = create_test_server(test_state().await);

    let response = server
        .post("/rides")
        .json(&json!({ "date": "2025-06-01", "distance": 40 }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["ride"]["date"], "2025-06-01T00:00:00Z");
}

#[tokio::test]
async fn test_create_ride_rejects_malformed_date() {
    let server = create_test_server(test_state().await);

    let response = server
        .post("/rides")
        .json(&json!({ "date": "next tuesday" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("Invalid ride date"));
}

#[tokio::test]
async fn test_save_ride_legacy_shape() {
    let server = create_test_server(test_state().await);

    let response = server
        .post("/save-ride")
        .json(&json!({ "distance": 55, "fuelUsed": 3.2, "mileage": 17.2 }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Ride saved successfully");

    // The legacy route persists through the same store
    let listed = server.get("/rides").await;
    let rides: serde_json::Value = listed.json();
    assert_eq!(rides.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_rides_empty() {
    let server = create_test_server(test_state().await);

    let response = server.get("/rides").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_rides_sorted_and_filtered() {
    let server = create_test_server(test_state().await);

    for (date, distance) in [
        ("2025-06-01", 10),
        ("2025-06-03", 30),
        ("2025-06-02", 20),
        ("2025-05-01", 99),
    ] {
        server
            .post("/rides")
            .json(&json!({ "date": date, "distance": distance }))
            .await
            .assert_status_ok();
    }

    let response = server.get("/rides?from=2025-06-01&to=2025-06-30").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let distances: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["distanceKm"].as_f64().unwrap())
        .collect();

    // Date-descending, May ride excluded
    assert_eq!(distances, vec![30.0, 20.0, 10.0]);
}

#[tokio::test]
async fn test_list_rides_ignores_half_open_range() {
    let server = create_test_server(test_state().await);

    server
        .post("/rides")
        .json(&json!({ "date": "2025-06-01", "distance": 10 }))
        .await
        .assert_status_ok();

    // Only one bound supplied: the filter does not apply
    let response = server.get("/rides?from=2030-01-01").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_rides_rejects_malformed_range() {
    let server = create_test_server(test_state().await);

    let response = server.get("/rides?from=garbage&to=2025-06-30").await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

// ============================================================================
// Fuel news proxy
// ============================================================================

fn gnews_stub() -> Router {
    Router::new().route(
        "/search",
        get(|| async {
            Json(json!({
                "totalArticles": 4,
                "articles": [
                    {
                        "title": "Petrol price revised in Chennai",
                        "description": "Fresh rates from this morning",
                        "source": { "name": "The Hindu", "url": "https://thehindu.com" },
                        "url": "https://example.com/petrol-revised"
                    },
                    {
                        "title": "Local cricket roundup",
                        "description": "Weekend scores",
                        "source": { "name": "Sports Desk", "url": "" },
                        "url": "https://example.com/cricket"
                    },
                    {
                        "title": "Crude oil slips on demand fears",
                        "url": "https://example.com/crude"
                    },
                    {
                        "title": "Diesel subsidy debate continues",
                        "description": "",
                        "url": "https://example.com/diesel"
                    }
                ]
            }))
        }),
    )
}

#[tokio::test]
async fn test_fuel_news_filters_and_shapes() {
    let base = spawn_upstream(gnews_stub()).await;

    let mut state = test_state().await;
    state.news = GnewsClient::with_base_url(&base, "test-key");
    let server = create_test_server(state);

    let response = server.get("/fuel-news").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let items = body.as_array().unwrap();

    // The cricket article is filtered out
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["title"], "Petrol price revised in Chennai");
    assert_eq!(items[0]["description"], "Fresh rates from this morning");
    assert_eq!(items[0]["source"], "The Hindu");

    // Missing and empty descriptions fall back, as does the missing source
    assert_eq!(items[1]["description"], "No description available");
    assert_eq!(items[1]["source"], "GNews");
    assert_eq!(items[2]["description"], "No description available");
}

#[tokio::test]
async fn test_fuel_news_upstream_malformed_payload() {
    let stub = Router::new().route("/search", get(|| async { "not json" }));
    let base = spawn_upstream(stub).await;

    let mut state = test_state().await;
    state.news = GnewsClient::with_base_url(&base, "test-key");
    let server = create_test_server(state);

    let response = server.get("/fuel-news").await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Failed to fetch fuel news");
}

#[tokio::test]
async fn test_fuel_news_upstream_unavailable() {
    let stub = Router::new().route(
        "/search",
        get(|| async { axum::http::StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = spawn_upstream(stub).await;

    let mut state = test_state().await;
    state.news = GnewsClient::with_base_url(&base, "test-key");
    let server = create_test_server(state);

    let response = server.get("/fuel-news").await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Fuel price proxy
// ============================================================================

fn price_sheet_stub() -> Router {
    Router::new().route(
        "/export",
        get(|| async {
            "District,Petrol,Diesel\n\
             Chennai,102.63,94.24\n\
             \"Coimbatore\",102.91,94.52\n\
             Madurai,not-a-number,94.79\n"
        }),
    )
}

async fn price_server() -> TestServer {
    let base = spawn_upstream(price_sheet_stub()).await;

    let mut state = test_state().await;
    state.prices = PriceSheetClient::with_export_url(&format!("{base}/export"));
    create_test_server(state)
}

#[tokio::test]
async fn test_fuel_price_full_sheet() {
    let server = price_server().await;

    let response = server.get("/fuel-price").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let rows = body.as_array().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["district"], "Chennai");
    assert_eq!(rows[1]["district"], "Coimbatore");
    assert_eq!(rows[1]["petrol"], 102.91);

    // The malformed cell survives as null rather than dropping the row
    assert!(rows[2]["petrol"].is_null());
    assert_eq!(rows[2]["diesel"], 94.79);
}

#[tokio::test]
async fn test_fuel_price_district_lookup_case_insensitive() {
    let server = price_server().await;

    let upper = server.get("/fuel-price?district=Chennai").await;
    upper.assert_status_ok();

    let lower = server.get("/fuel-price?district=chennai").await;
    lower.assert_status_ok();

    let upper_body: serde_json::Value = upper.json();
    let lower_body: serde_json::Value = lower.json();
    assert_eq!(upper_body, lower_body);
    assert_eq!(upper_body["district"], "Chennai");
    assert_eq!(upper_body["petrol"], 102.63);
}

#[tokio::test]
async fn test_fuel_price_unknown_district_404() {
    let server = price_server().await;

    let response = server.get("/fuel-price?district=Mumbai").await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "District not found");
}

// ============================================================================
// Nearby bunks proxy
// ============================================================================

fn overpass_stub() -> Router {
    Router::new().route(
        "/",
        post(|| async {
            Json(json!({
                "elements": [
                    {
                        "type": "node",
                        "id": 1,
                        "lat": 13.05,
                        "lon": 80.25,
                        "tags": { "name": "HP Fuel Station" }
                    },
                    {
                        "type": "way",
                        "id": 2,
                        "center": { "lat": 13.06, "lon": 80.26 }
                    },
                    {
                        "type": "relation",
                        "id": 3,
                        "tags": { "name": "No Coordinates Here" }
                    }
                ]
            }))
        }),
    )
}

#[tokio::test]
async fn test_nearby_bunks_flattens_elements() {
    let base = spawn_upstream(overpass_stub()).await;

    let mut state = test_state().await;
    state.overpass = OverpassClient::with_base_url(&base);
    let server = create_test_server(state);

    let response = server.get("/nearby-bunks?lat=13.05&lng=80.25").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let stations = body.as_array().unwrap();

    // The coordinate-less relation is dropped
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0]["name"], "HP Fuel Station");
    assert_eq!(stations[0]["lat"], 13.05);

    // The way resolves through its center, with the placeholder name
    assert_eq!(stations[1]["name"], "Petrol Bunk");
    assert_eq!(stations[1]["lat"], 13.06);
    assert_eq!(stations[1]["lng"], 80.26);
}

#[tokio::test]
async fn test_nearby_bunks_requires_both_coordinates() {
    // Default (unreachable in tests) clients: a 400 here proves no outbound
    // call was attempted
    let server = create_test_server(test_state().await);

    for path in ["/nearby-bunks", "/nearby-bunks?lat=13.05", "/nearby-bunks?lng=80.25"] {
        let response = server.get(path).await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Latitude & Longitude required");
    }
}
