use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use store_locator::domain::geo::Coordinate;
use store_locator::infrastructure::geocoding::{GeocodeError, Geocoder, NominatimGeocoder};

fn geocoder(server: &MockServer, max_retries: usize) -> NominatimGeocoder {
    NominatimGeocoder::new(&server.uri(), 5, max_retries)
        .unwrap()
        .with_backoff_base_ms(1)
}

fn atoyac() -> serde_json::Value {
    json!({
        "lat": "19.3702",
        "lon": "-99.1590",
        "display_name": "Atoyac, Benito Juárez, Ciudad de México",
        "address": {"postcode": "03310"}
    })
}

#[tokio::test]
async fn test_forward_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Atoyac, CDMX"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([atoyac()])))
        .expect(1)
        .mount(&server)
        .await;

    let place = geocoder(&server, 0)
        .forward("Atoyac, CDMX")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(place.coordinate, Coordinate::new(19.3702, -99.1590));
    assert_eq!(place.postal_code.unwrap().as_str(), "03310");
}

#[tokio::test]
async fn test_forward_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let place = geocoder(&server, 0).forward("nowhere at all").await.unwrap();

    assert!(place.is_none());
}

#[tokio::test]
async fn test_reverse_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "19.3702"))
        .and(query_param("lon", "-99.159"))
        .respond_with(ResponseTemplate::new(200).set_body_json(atoyac()))
        .mount(&server)
        .await;

    let place = geocoder(&server, 0)
        .reverse(Coordinate::new(19.3702, -99.159))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(place.display_name, "Atoyac, Benito Juárez, Ciudad de México");
}

#[tokio::test]
async fn test_reverse_in_the_ocean_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    let place = geocoder(&server, 0)
        .reverse(Coordinate::new(0.0, -140.0))
        .await
        .unwrap();

    assert!(place.is_none());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([atoyac()])))
        .expect(1)
        .mount(&server)
        .await;

    let place = geocoder(&server, 2).forward("Atoyac").await.unwrap();

    assert!(place.is_some());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let err = geocoder(&server, 3).forward("Atoyac").await.unwrap_err();

    assert!(matches!(err, GeocodeError::UnexpectedStatus { status: 400 }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = geocoder(&server, 2).forward("Atoyac").await.unwrap_err();

    assert!(matches!(err, GeocodeError::UnexpectedStatus { status: 429 }));
    assert!(err.is_transient());
}
