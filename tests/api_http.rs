// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /
// - GET /api/houses (filters, zoom cap, limit, pagination, lenient params)
// - CORS headers

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use house_finder_api::{router_with, Dataset};

const BODY_LIMIT: usize = 16 * 1024 * 1024;

fn router_from(listings: Json) -> Router {
    let (ds, report) =
        Dataset::from_json_str(&listings.to_string(), true).expect("build test dataset");
    assert_eq!(report.rejected, 0);
    router_with(ds, false).expect("build router")
}

/// `n` sale houses at (10,10) with prices 1000, 2000, ... in dataset order.
fn ascending_houses(n: usize) -> Json {
    let items: Vec<Json> = (0..n)
        .map(|i| {
            json!({
                "id": i,
                "lat": 10.0, "lon": 10.0, "beds": 2, "baths": 1,
                "listingType": "sale", "homeType": "house",
                "prices": [format!("01/01/2024 | {}", (i + 1) * 1000)]
            })
        })
        .collect();
    Json::Array(items)
}

async fn get_json(app: &Router, uri: &str) -> Json {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn ids(v: &Json) -> Vec<u64> {
    v["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|h| h["id"].as_u64().expect("numeric id"))
        .collect()
}

#[tokio::test]
async fn root_returns_liveness_text() {
    let app = router_from(json!([]));
    let req = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("build GET /");
    let resp = app.oneshot(req).await.expect("oneshot /");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "Hello World!");
}

#[tokio::test]
async fn min_beds_and_listing_type_return_latest_price() {
    let app = router_from(json!([
        {"id": 1, "lat": 10, "lon": 10, "beds": 3, "baths": 2, "listingType": "sale",
         "homeType": "house", "prices": ["01/01/2023 | 100000", "01/06/2023 | 150000"]},
        {"id": 2, "lat": 10, "lon": 10, "beds": 1, "baths": 1, "listingType": "sale",
         "homeType": "house", "prices": ["01/01/2023 | 90000"]},
        {"id": 3, "lat": 10, "lon": 10, "beds": 4, "baths": 2, "listingType": "rent",
         "homeType": "house", "prices": ["01/01/2023 | 2000"]}
    ]));

    for uri in [
        "/api/houses?minBeds=2&listingType=sale",
        "/api/houses?beds=2&listingType=sale",
    ] {
        let v = get_json(&app, uri).await;
        assert_eq!(v["count"], 1, "{uri}");
        assert_eq!(v["totalMatches"], 1);
        assert_eq!(v["data"][0]["id"], 1);
        assert_eq!(v["data"][0]["latestPrice"].as_f64(), Some(150_000.0));
        assert!(v["zoomLevel"].is_null());
        assert!(v["appliedZoomLimit"].is_null());
    }
}

#[tokio::test]
async fn zoom_five_caps_to_top_two_hundred_by_price() {
    let app = router_from(ascending_houses(300));
    let v = get_json(&app, "/api/houses?zoomLevel=5").await;

    assert_eq!(v["appliedZoomLimit"], 200);
    assert_eq!(v["zoomLevel"], 5);
    assert_eq!(v["count"], 200);
    assert_eq!(v["totalMatches"], 200);

    let prices: Vec<f64> = v["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["latestPrice"].as_f64().unwrap())
        .collect();
    assert_eq!(prices.first().copied(), Some(300_000.0));
    assert_eq!(prices.last().copied(), Some(101_000.0));
    assert!(prices.windows(2).all(|w| w[0] >= w[1]), "descending by price");
}

#[tokio::test]
async fn limit_without_zoom_takes_first_in_dataset_order() {
    let app = router_from(ascending_houses(50));
    let v = get_json(&app, "/api/houses?limit=10").await;
    assert_eq!(v["count"], 10);
    assert_eq!(v["totalMatches"], 50);
    assert_eq!(ids(&v), (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn empty_and_malformed_params_fall_back_to_defaults() {
    let app = router_from(ascending_houses(5));
    let v = get_json(
        &app,
        "/api/houses?beds=&baths=two&minLat=abc&maxPrice=&limit=-3&zoomLevel=&listingType=&page=x",
    )
    .await;
    assert_eq!(v["count"], 5);
    assert_eq!(v["totalMatches"], 5);
    assert!(v["zoomLevel"].is_null());
    assert!(v.get("page").is_none());
}

#[tokio::test]
async fn bounding_box_and_price_range() {
    let app = router_from(json!([
        {"id": 1, "lat": 51.5, "lon": -0.1, "beds": 2, "baths": 1, "listingType": "sale",
         "homeType": "flat", "prices": ["01/01/2024 | 300000"]},
        {"id": 2, "lat": 53.4, "lon": -2.2, "beds": 2, "baths": 1, "listingType": "sale",
         "homeType": "flat", "prices": ["01/01/2024 | 200000"]},
        {"id": 3, "lat": 51.6, "lon": 0.2, "beds": 2, "baths": 1, "listingType": "sale",
         "homeType": "house", "prices": ["01/01/2024 | 900000"]}
    ]));

    let v = get_json(&app, "/api/houses?minLat=51&maxLat=52&minLng=-1&maxLng=1").await;
    assert_eq!(ids(&v), vec![1, 3]);

    let v = get_json(
        &app,
        "/api/houses?minLat=51&maxLat=52&minLng=-1&maxLng=1&maxPrice=500000",
    )
    .await;
    assert_eq!(ids(&v), vec![1]);

    let v = get_json(&app, "/api/houses?minPrice=250000&homeType=house").await;
    assert_eq!(ids(&v), vec![3]);
}

#[tokio::test]
async fn pagination_mode_adds_page_fields() {
    let app = router_from(ascending_houses(23));
    let v = get_json(&app, "/api/houses?limit=10&page=3").await;
    assert_eq!(v["page"], 3);
    assert_eq!(v["totalPages"], 3);
    assert_eq!(v["totalMatches"], 23);
    assert_eq!(ids(&v), vec![20, 21, 22]);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = router_from(json!([]));
    let req = Request::builder()
        .uri("/api/houses")
        .header("origin", "https://maps.example.org")
        .body(Body::empty())
        .expect("build GET with origin");
    let resp = app.oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK);
    let allow = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    assert_eq!(allow, "https://maps.example.org");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router_from(json!([]));
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zoom_level_is_echoed_normalized() {
    let app = router_from(ascending_houses(3));

    let v = get_json(&app, "/api/houses?zoomLevel=7.9").await;
    assert_eq!(v["zoomLevel"], 7);
    assert_eq!(v["appliedZoomLimit"], 400);

    let v = get_json(&app, "/api/houses?zoomLevel=abc").await;
    assert!(v["zoomLevel"].is_null());
    assert!(v["appliedZoomLimit"].is_null());
    assert_eq!(v["count"], 3);
}

#[tokio::test]
async fn listing_objects_keep_file_text_and_derived_price() {
    let app = router_from(json!([
        {"id": 1, "lat": 10, "lon": 10, "beds": 3, "baths": 2, "listingType": "sale",
         "homeType": "house", "latestPrice": 5,
         "prices": ["1/1/2023|100000.00", "01/06/2023 | 150000"]}
    ]));
    let v = get_json(&app, "/api/houses").await;
    let h = &v["data"][0];
    assert_eq!(h["prices"], json!(["1/1/2023|100000.00", "01/06/2023 | 150000"]));
    assert_eq!(h["latestPrice"].as_f64(), Some(150_000.0));
}
