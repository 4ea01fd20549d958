//! Weather provider HTTP client.
//!
//! Wraps the provider's `current.json`, `forecast.json` and `search.json`
//! endpoints. Every call consults its response cache first and populates it
//! after a successful round trip; failures are never cached.

use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use skydash_core::{ApiKey, Clock, SystemClock, WeatherConfig};

use crate::cache::ResponseCache;
use crate::error::UpstreamError;
use crate::types::{
    ApiErrorBody, Forecast, RawCurrentResponse, RawForecastResponse, SearchLocation,
    WeatherSnapshot,
};

/// Provider maximum for `forecast.json?days=`
pub const MAX_FORECAST_DAYS: u8 = 10;

/// Trimmed queries shorter than this never reach the network
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

const USER_AGENT: &str = "SkyDash/0.1.0";

/// Current conditions and forecasts for a free-text city.
pub trait WeatherApi: Send + Sync {
    fn fetch_current(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherSnapshot, UpstreamError>> + Send;

    fn fetch_forecast(
        &self,
        city: &str,
        days: u8,
    ) -> impl Future<Output = Result<Forecast, UpstreamError>> + Send;
}

/// Best-effort location autocomplete. Never fails; errors read as no results.
pub trait LocationSource: Send + Sync {
    fn search_locations(&self, query: &str) -> impl Future<Output = Vec<SearchLocation>> + Send;
}

/// Cache key for search results: trimmed and lowercased query
pub fn search_cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Cache key for current conditions: trimmed and lowercased city
pub fn current_cache_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Cache key for forecasts: lowercased city plus the clamped day count
pub fn forecast_cache_key(city: &str, days: u8) -> String {
    format!("{}-{}", city.trim().to_lowercase(), clamp_days(days))
}

pub fn clamp_days(days: u8) -> u8 {
    days.clamp(1, MAX_FORECAST_DAYS)
}

pub struct WeatherClient {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    search_cache: ResponseCache<Vec<SearchLocation>>,
    current_cache: ResponseCache<WeatherSnapshot>,
    forecast_cache: ResponseCache<Forecast>,
}

impl WeatherClient {
    pub fn new(api_key: ApiKey, config: &WeatherConfig) -> Result<Self, UpstreamError> {
        Self::with_clock(api_key, config, Arc::new(SystemClock))
    }

    /// Build a client whose caches read time from `clock`.
    pub fn with_clock(
        api_key: ApiKey,
        config: &WeatherConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| UpstreamError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_cache: ResponseCache::with_clock(config.search_ttl(), clock.clone()),
            current_cache: ResponseCache::with_clock(config.weather_ttl(), clock.clone()),
            forecast_cache: ResponseCache::with_clock(config.weather_ttl(), clock),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current conditions for `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError> {
        let key = current_cache_key(city);
        if let Some(hit) = self.current_cache.get(&key) {
            tracing::debug!("Current weather cache hit: {}", key);
            return Ok(hit);
        }

        let raw: RawCurrentResponse = self
            .get(
                "current.json",
                &[("q", city), ("lang", "en"), ("aqi", "no")],
            )
            .await
            .inspect_err(|e| tracing::error!("Failed to fetch current weather: {}", e))?;

        let (location, current) = match (raw.location, raw.current) {
            (Some(location), Some(current)) => (location, current),
            _ => {
                return Err(UpstreamError::InvalidResponse(
                    "missing location or current".to_string(),
                ))
            }
        };

        let snapshot = WeatherSnapshot { location, current };
        self.current_cache.put(key, snapshot.clone());
        Ok(snapshot)
    }

    /// Forecast for `city`; `days` is clamped to `1..=10`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, city: &str, days: u8) -> Result<Forecast, UpstreamError> {
        let days = clamp_days(days);
        let key = forecast_cache_key(city, days);
        if let Some(hit) = self.forecast_cache.get(&key) {
            tracing::debug!("Forecast cache hit: {}", key);
            return Ok(hit);
        }

        let days_param = days.to_string();
        let raw: RawForecastResponse = self
            .get(
                "forecast.json",
                &[
                    ("q", city),
                    ("days", days_param.as_str()),
                    ("lang", "en"),
                    ("aqi", "no"),
                    ("alerts", "no"),
                ],
            )
            .await
            .inspect_err(|e| tracing::error!("Failed to fetch forecast: {}", e))?;

        let (location, current, forecast) = match (raw.location, raw.current, raw.forecast) {
            (Some(location), Some(current), Some(forecast)) => (location, current, forecast),
            _ => {
                return Err(UpstreamError::InvalidResponse(
                    "missing location, current or forecast".to_string(),
                ))
            }
        };

        let forecast = Forecast {
            snapshot: WeatherSnapshot { location, current },
            days: forecast.forecastday,
        };
        self.forecast_cache.put(key, forecast.clone());
        Ok(forecast)
    }

    /// Autocomplete suggestions for `query`.
    ///
    /// Short queries return nothing without a request. Any failure is logged
    /// and reported as an empty result so typing is never blocked.
    #[instrument(skip(self), level = "debug")]
    pub async fn search_locations(&self, query: &str) -> Vec<SearchLocation> {
        let key = search_cache_key(query);
        if key.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Vec::new();
        }

        if let Some(hit) = self.search_cache.get(&key) {
            tracing::debug!("Search cache hit: {}", key);
            return hit;
        }

        match self
            .get::<Option<Vec<SearchLocation>>>("search.json", &[("q", key.as_str())])
            .await
        {
            Ok(results) => {
                let results = results.unwrap_or_default();
                self.search_cache.put(key, results.clone());
                results
            }
            Err(e) => {
                tracing::warn!("Error searching locations: {}", e);
                Vec::new()
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.expose())])
            .query(params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Map provider responses onto `UpstreamError`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body)
                .map_err(|e| UpstreamError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(UpstreamError::InvalidApiKey)
        } else if status == StatusCode::FORBIDDEN {
            Err(UpstreamError::QuotaExceeded)
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .ok()
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Failed to fetch weather data".to_string());
            Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl WeatherApi for WeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError> {
        WeatherClient::fetch_current(self, city).await
    }

    async fn fetch_forecast(&self, city: &str, days: u8) -> Result<Forecast, UpstreamError> {
        WeatherClient::fetch_forecast(self, city, days).await
    }
}

impl LocationSource for WeatherClient {
    async fn search_locations(&self, query: &str) -> Vec<SearchLocation> {
        WeatherClient::search_locations(self, query).await
    }
}
