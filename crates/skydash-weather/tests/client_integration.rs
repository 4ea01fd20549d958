//! End-to-end tests for the weather client, search engine and views
//! against a mock provider.

use std::sync::Arc;
use std::time::Duration;

use skydash_core::{ApiKey, WeatherConfig};
use skydash_weather::{
    get_humidity_data, get_temperature_data, get_wind_data, LocationSearch, SearchPhase,
    UpstreamError, WeatherClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherClient {
    let config = WeatherConfig {
        base_url: server.uri(),
        ..WeatherConfig::default()
    };
    WeatherClient::new(ApiKey::new("integration_key"), &config).unwrap()
}

fn search_results() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 2617247,
            "name": "Bangkok",
            "region": "Krung Thep",
            "country": "Thailand",
            "lat": 13.75,
            "lon": 100.52,
            "url": "bangkok-krung-thep-thailand"
        },
        {
            "id": 2604373,
            "name": "Bandung",
            "region": "West Java",
            "country": "Indonesia",
            "lat": -6.9,
            "lon": 107.62,
            "url": "bandung-west-java-indonesia"
        }
    ])
}

fn bangkok_forecast() -> serde_json::Value {
    let hours: Vec<serde_json::Value> = (0..24)
        .map(|h| {
            serde_json::json!({
                "time_epoch": 1751648400 + h * 3600,
                "time": format!("2025-07-05 {:02}:00", h),
                "temp_c": 27.0 + (h as f64) * 0.25,
                "feelslike_c": 30.0 + (h as f64) * 0.25,
                "wind_kph": 8.0,
                "wind_degree": 210,
                "wind_dir": "SSW",
                "humidity": 80 - h,
                "condition": { "text": "Patchy rain nearby", "icon": "//cdn/176.png", "code": 1063 }
            })
        })
        .collect();

    serde_json::json!({
        "location": {
            "name": "Bangkok",
            "region": "Krung Thep",
            "country": "Thailand",
            "lat": 13.75,
            "lon": 100.52,
            "tz_id": "Asia/Bangkok",
            "localtime_epoch": 1751691600,
            "localtime": "2025-07-05 12:00"
        },
        "current": {
            "temp_c": 32.0,
            "feelslike_c": 38.5,
            "wind_kph": 13.0,
            "wind_degree": 200,
            "wind_dir": "SSW",
            "gust_kph": 18.4,
            "humidity": 66,
            "uv": 9.0,
            "condition": { "text": "Partly cloudy", "icon": "//cdn/116.png", "code": 1003 }
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2025-07-05",
                    "date_epoch": 1751673600,
                    "day": { "maxtemp_c": 34.1, "mintemp_c": 26.8, "avghumidity": 72.0 },
                    "hour": hours
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_search_ban_suggests_bangkok_and_bandung() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("key", "integration_key"))
        .and(query_param("q", "ban"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_results()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    let mut search = LocationSearch::with_window(client, Duration::from_millis(20), 2);
    let mut rx = search.subscribe();

    search.set_query("b");
    search.set_query("ba");
    search.set_query("ban");

    let state = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            if matches!(state.phase, SearchPhase::Populated | SearchPhase::Empty) {
                return state;
            }
        }
    })
    .await
    .expect("search did not settle");

    let names: Vec<String> = state.suggestions.iter().map(|s| s.display_name()).collect();
    assert_eq!(names, vec!["Bangkok, Thailand", "Bandung, Indonesia"]);
    assert!(!state.is_loading);
    assert_eq!(state.search_query, "ban");
}

#[tokio::test]
async fn test_bangkok_views_share_one_cached_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Bangkok"))
        .and(query_param("days", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bangkok_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let temperature = get_temperature_data(&client, "Bangkok").await.unwrap();
    assert_eq!(temperature.current, 32.0);
    assert_eq!(temperature.feels_like, 38.5);
    assert_eq!(temperature.min, 26.8);
    assert_eq!(temperature.max, 34.1);
    assert_eq!(temperature.hourly_forecast.len(), 24);
    assert_eq!(temperature.hourly_forecast[9].time, "09:00");

    let wind = get_wind_data(&client, "Bangkok").await.unwrap();
    assert_eq!(wind.gust, Some(18.4));
    assert_eq!(wind.hourly_forecast[0].direction, "SSW");

    let humidity = get_humidity_data(&client, "Bangkok").await.unwrap();
    assert_eq!(humidity.current, 66);
    assert_eq!(humidity.hourly_forecast[23].humidity, 57);
}

#[tokio::test]
async fn test_views_surface_quota_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 2007, "message": "API key has exceeded calls per month quota." }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = get_temperature_data(&client, "Bangkok").await.unwrap_err();

    assert!(matches!(err, UpstreamError::QuotaExceeded));
    assert_eq!(err.to_string(), "API quota exceeded");
}

#[tokio::test]
async fn test_views_reject_forecast_without_days() {
    let server = MockServer::start().await;

    let mut body = bangkok_forecast();
    body["forecast"]["forecastday"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = get_humidity_data(&client, "Bangkok").await.unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bangkok_forecast()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.fetch_forecast("Bangkok", 1).await;
    assert!(matches!(first, Err(UpstreamError::Api { status: 500, .. })));

    let second = client.fetch_forecast("Bangkok", 1).await.unwrap();
    assert_eq!(second.snapshot.location.name, "Bangkok");
}
