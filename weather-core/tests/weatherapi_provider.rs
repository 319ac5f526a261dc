//! Integration tests for WeatherApiProvider using wiremock.

use weather_core::{
    Coordinates, LookupError, LookupQuery, UiState, WeatherApiProvider, WeatherProvider,
    controller::LookupController, render,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Paris", "country": "France" },
        "current": {
            "temp_c": 15,
            "feelslike_c": 13,
            "condition": { "text": "Cloudy", "icon": "//x/icon.png" }
        }
    })
}

fn provider(server: &MockServer) -> WeatherApiProvider {
    WeatherApiProvider::with_base_url("TEST_KEY".to_string(), format!("{}/v1", server.uri()))
}

#[tokio::test]
async fn test_current_weather_success_renders_panel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller = LookupController::default();
    let ticket = controller.submit_city("Paris").unwrap();
    let snapshot = provider(&mock_server).fetch_weather(&ticket.query).await.unwrap();
    controller.lookup_succeeded(ticket.token, snapshot);

    assert!(matches!(controller.state(), UiState::Loaded(_)));

    let text = render(controller.state(), controller.geolocation()).to_string();
    assert!(text.contains("Paris, France"));
    assert!(text.contains("15°C"));
    assert!(text.contains("Cloudy"));
    assert!(text.contains("13°C"));
    assert!(text.contains("https://x/icon.png"));
}

#[tokio::test]
async fn test_coordinate_query_is_sent_as_lat_lon() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "48.85,2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = LookupQuery::Coordinates(Coordinates::new(48.85, 2.35));
    let snapshot = provider(&mock_server).fetch_weather(&query).await.unwrap();

    assert_eq!(snapshot.location_name, "Paris");
}

#[tokio::test]
async fn test_place_names_are_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "New York & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = LookupQuery::Place("New York & Co".to_string());
    assert!(provider(&mock_server).fetch_weather(&query).await.is_ok());
}

#[tokio::test]
async fn test_bad_request_is_city_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&mock_server)
        .await;

    let mut controller = LookupController::default();
    let ticket = controller.submit_city("Atlantis").unwrap();
    let err = provider(&mock_server).fetch_weather(&ticket.query).await.unwrap_err();
    assert_eq!(err, LookupError::CityNotFound);

    controller.lookup_failed(ticket.token, &err);
    assert_eq!(
        controller.state(),
        &UiState::Error("City not found. Please check the spelling and try again.".to_string())
    );
}

#[tokio::test]
async fn test_other_status_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key disabled"))
        .mount(&mock_server)
        .await;

    let query = LookupQuery::Place("Paris".to_string());
    let err = provider(&mock_server).fetch_weather(&query).await.unwrap_err();

    assert!(matches!(err, LookupError::Generic { .. }));
    assert!(err.detail().contains("403"));
    assert!(err.detail().contains("API key disabled"));
    assert_eq!(
        err.user_message(),
        "An error occurred while fetching weather data. Please try again later."
    );
}

#[tokio::test]
async fn test_malformed_body_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": { "country": "France" },
            "current": { "temp_c": 15, "condition": { "text": "Cloudy" } }
        })))
        .mount(&mock_server)
        .await;

    let query = LookupQuery::Place("Paris".to_string());
    let err = provider(&mock_server).fetch_weather(&query).await.unwrap_err();

    assert!(matches!(err, LookupError::Generic { .. }));
}

#[tokio::test]
async fn test_network_failure_is_generic() {
    // Port 1 is reserved; connecting to it is refused.
    let provider = WeatherApiProvider::with_base_url("TEST_KEY".to_string(), "http://127.0.0.1:1/v1");
    let mut controller = LookupController::default();
    let ticket = controller.submit_city("Paris").unwrap();

    let err = provider.fetch_weather(&ticket.query).await.unwrap_err();
    controller.lookup_failed(ticket.token, &err);

    assert_eq!(
        controller.state(),
        &UiState::Error(
            "An error occurred while fetching weather data. Please try again later.".to_string()
        )
    );
}
