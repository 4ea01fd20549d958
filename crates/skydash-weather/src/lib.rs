//! Weather data for SkyDash
//!
//! Talks to a WeatherAPI.com-compatible provider, caches its responses with
//! a TTL, drives debounced location autocomplete, and shapes forecasts into
//! per-page view models.

pub mod cache;
pub mod classify;
pub mod client;
pub mod error;
pub mod search;
pub mod types;
pub mod views;

pub use cache::{CacheEntry, ResponseCache};
pub use classify::{compass_name, HumidityLevel, UvLevel, WindLevel};
pub use client::{LocationSource, WeatherApi, WeatherClient, MAX_FORECAST_DAYS};
pub use error::UpstreamError;
pub use search::{LocationSearch, SearchMachine, SearchPhase, SearchState};
pub use types::*;
pub use views::{
    get_humidity_data, get_overview_data, get_temperature_data, get_wind_data, HumidityData,
    OverviewData, TemperatureData, WindData,
};
