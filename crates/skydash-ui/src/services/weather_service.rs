//! Weather backend: async view loading.
//! All network work runs on the runtime; results are sent back via mpsc
//! tagged with the request id so the owner can drop superseded ones.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use skydash_weather::views::{
    get_humidity_data, get_overview_data, get_temperature_data, get_wind_data,
};
use skydash_weather::{
    HumidityData, OverviewData, TemperatureData, UpstreamError, WeatherApi, WindData,
};

use crate::routes::Route;

/// Error type for weather operations
#[derive(Debug, Clone)]
pub enum WeatherError {
    Connection(String),
    Timeout,
    Upstream {
        message: String,
        user_message: &'static str,
        /// Explanation from the provider's error body, if it sent one
        provider_message: Option<String>,
    },
    NotInitialized,
}

impl WeatherError {
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            WeatherError::Upstream {
                provider_message, ..
            } => provider_message.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Connection(s) => write!(f, "Weather error: {}", s),
            WeatherError::Timeout => write!(f, "Weather request timed out"),
            WeatherError::Upstream { message, .. } => write!(f, "{}", message),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<UpstreamError> for WeatherError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Network(s) => WeatherError::Connection(s),
            UpstreamError::Timeout => WeatherError::Timeout,
            other => WeatherError::Upstream {
                user_message: other.user_message(),
                message: other.to_string(),
                provider_message: match &other {
                    UpstreamError::Api { message, .. } if !message.is_empty() => {
                        Some(message.clone())
                    }
                    _ => None,
                },
            },
        }
    }
}

/// Data for whichever page was requested
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    Overview(OverviewData),
    Temperature(TemperatureData),
    Wind(WindData),
    Humidity(HumidityData),
}

impl ViewData {
    pub fn route(&self) -> Route {
        match self {
            ViewData::Overview(_) => Route::Overview,
            ViewData::Temperature(_) => Route::Temperature,
            ViewData::Wind(_) => Route::Wind,
            ViewData::Humidity(_) => Route::Humidity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub id: u64,
    pub city: String,
    pub route: Route,
}

/// Messages sent from async operations back to the owner
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of loading the data for one page
    ViewLoaded {
        request_id: u64,
        result: Result<ViewData, WeatherError>,
    },
}

/// Fetch and shape the data a page needs.
pub async fn load_view<A: WeatherApi>(
    api: &A,
    route: Route,
    city: &str,
) -> Result<ViewData, UpstreamError> {
    match route {
        Route::Overview => get_overview_data(api, city).await.map(ViewData::Overview),
        Route::Temperature => get_temperature_data(api, city)
            .await
            .map(ViewData::Temperature),
        Route::Wind => get_wind_data(api, city).await.map(ViewData::Wind),
        Route::Humidity => get_humidity_data(api, city).await.map(ViewData::Humidity),
    }
}

/// Request a page load asynchronously.
/// Sends `ViewLoaded` on the channel when complete, unless `cancel` fires first.
pub fn request_view<A: WeatherApi + 'static>(
    tx: &std::sync::mpsc::Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    api: Arc<A>,
    request: ViewRequest,
    cancel: CancellationToken,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let ViewRequest { id, city, route } = request;

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("View request {} cancelled", id);
                return;
            }
            result = load_view(&*api, route, &city) => result,
        };

        let result = result.map_err(|e| {
            tracing::error!("Failed to load {} for {}: {}", route.title(), city, e);
            WeatherError::from(e)
        });

        if tx
            .send(WeatherServiceMessage::ViewLoaded {
                request_id: id,
                result,
            })
            .is_err()
        {
            tracing::debug!("View request {} finished after receiver closed", id);
        }
    });
}
