//! OpenWeather client and weather screen against a mock HTTP server.

use std::{sync::Arc, time::Duration};

use weathermap_core::{
    App, Coordinates, FixedLocation, OpenWeatherProvider, Preferences, Units, WeatherError,
    WeatherProvider,
    provider::GENERIC_API_ERROR,
    screens::{MapViewport, MapWidget, Status, weather::NOT_FOUND_MESSAGE},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "TEST_KEY";

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1278, "lat": 51.5074 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "main": {
            "temp": 21.6,
            "feels_like": 21.2,
            "temp_min": 20.0,
            "temp_max": 23.0,
            "pressure": 1012,
            "humidity": 64
        },
        "dt": 1_700_000_000,
        "name": "London",
        "cod": 200
    })
}

fn client_for(server: &MockServer) -> OpenWeatherProvider {
    #[allow(clippy::expect_used)]
    OpenWeatherProvider::new(API_KEY.to_string(), server.uri(), Duration::from_secs(5))
        .expect("Failed to create client")
}

#[tokio::test]
async fn coordinates_request_carries_exact_values_and_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5074"))
        .and(query_param("lon", "-0.1278"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server)
        .fetch_by_coordinates(Coordinates::new(51.5074, -0.1278), Units::Metric)
        .await
        .expect("should succeed");

    assert_eq!(reading.location_name, "London");
    assert!((reading.temperature - 21.6).abs() < f64::EPSILON);
    assert_eq!(reading.humidity_pct, 64);
    assert_eq!(reading.condition, "broken clouds");
    assert_eq!(reading.units, Units::Metric);
}

#[tokio::test]
async fn imperial_units_are_requested() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server)
        .fetch_by_coordinates(Coordinates::new(51.5074, -0.1278), Units::Imperial)
        .await
        .expect("should succeed");

    assert_eq!(reading.units, Units::Imperial);
}

#[tokio::test]
async fn postal_code_search_queries_by_zip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("zip", "10001-1234,us"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_by_query("10001-1234", Units::Metric).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn place_search_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server)
        .fetch_by_query("São Paulo & Co", Units::Metric)
        .await
        .expect("should succeed");

    assert_eq!(reading.coordinates, Coordinates::new(51.5074, -0.1278));
}

#[tokio::test]
async fn not_found_carries_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_by_query("Atlantis", Units::Metric).await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::NotFound {
            message: "city not found".to_string(),
        }
    );
}

#[tokio::test]
async fn unauthorized_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_by_coordinates(Coordinates::new(0.0, 0.0), Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        WeatherError::Api {
            status: 401,
            message: "Invalid API key".to_string(),
        }
    );
}

#[tokio::test]
async fn server_error_without_body_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_by_query("Paris", Units::Metric).await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::Api {
            status: 503,
            message: GENERIC_API_ERROR.to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_success_body_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_by_query("Paris", Units::Metric).await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::Api {
            status: 200,
            message: GENERIC_API_ERROR.to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    #[allow(clippy::expect_used)]
    let client = OpenWeatherProvider::new(
        API_KEY.to_string(),
        "http://127.0.0.1:1".to_string(),
        Duration::from_secs(2),
    )
    .expect("Failed to create client");

    let err = client.fetch_by_query("Paris", Units::Metric).await.unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
}

#[derive(Debug, Default)]
struct NullWidget;

impl MapWidget for NullWidget {
    fn animate_to_region(&self, _region: MapViewport, _duration: Duration) {}
}

fn app_for(server: &MockServer) -> App {
    App::new(
        Arc::new(client_for(server)),
        Arc::new(FixedLocation::default()),
        Arc::new(NullWidget),
        Preferences::default(),
    )
}

#[tokio::test]
async fn failed_search_shows_location_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let app = app_for(&server);
    app.weather.submit_search_text("Atlantis").await;

    assert_eq!(app.weather.state().status, Status::Error(NOT_FOUND_MESSAGE.to_string()));
}

#[tokio::test]
async fn successful_search_recenters_the_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .mount(&server)
        .await;

    let app = app_for(&server);
    let mut map_state = app.map.subscribe();

    app.weather.set_search_text("London");
    app.weather.submit_search().await;

    tokio::time::timeout(Duration::from_secs(2), map_state.changed())
        .await
        .expect("map updated in time")
        .expect("map screen alive");

    assert_eq!(app.weather.state().status, Status::Ready);
    assert!(app.weather.state().search_text.is_empty());
    assert_eq!(app.map.viewport().center(), Coordinates::new(51.5074, -0.1278));
}
