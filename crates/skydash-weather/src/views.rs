//! View models for the detail pages.
//!
//! Each getter issues a single one-day forecast request and projects day 0
//! into a flat shape a renderer can bind to directly. Upstream errors
//! propagate unchanged; nothing here is partially populated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classify::{HumidityLevel, UvLevel, WindLevel};
use crate::client::WeatherApi;
use crate::error::UpstreamError;
use crate::types::{Forecast, ForecastDay, WeatherSnapshot};

/// Hourly series never exceed one day of samples
pub const MAX_HOURLY_POINTS: usize = 24;

const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTemperature {
    pub time: String,
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureData {
    pub current: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
    pub hourly_forecast: Vec<HourlyTemperature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWind {
    pub time: String,
    pub speed: f64,
    pub direction: String,
    pub degree: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindData {
    pub speed: f64,
    pub direction: String,
    pub degree: u16,
    pub gust: Option<f64>,
    pub level: WindLevel,
    pub hourly_forecast: Vec<HourlyWind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyHumidity {
    pub time: String,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumidityData {
    pub current: u8,
    pub level: HumidityLevel,
    pub hourly_forecast: Vec<HourlyHumidity>,
}

/// Current conditions with their classified levels, for the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewData {
    pub snapshot: WeatherSnapshot,
    pub humidity_level: HumidityLevel,
    pub wind_level: WindLevel,
    pub uv_level: UvLevel,
}

/// `"2025-07-05 14:00"` becomes `"14:00"`. Unparseable input is passed through.
pub fn display_time(provider_time: &str) -> String {
    NaiveDateTime::parse_from_str(provider_time, PROVIDER_TIME_FORMAT)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| provider_time.to_string())
}

fn first_day(forecast: &Forecast) -> Result<&ForecastDay, UpstreamError> {
    forecast
        .today()
        .ok_or_else(|| UpstreamError::InvalidResponse("forecast has no days".to_string()))
}

pub fn temperature_from_forecast(forecast: &Forecast) -> Result<TemperatureData, UpstreamError> {
    let today = first_day(forecast)?;
    let current = &forecast.snapshot.current;

    Ok(TemperatureData {
        current: current.temp_c,
        feels_like: current.feelslike_c,
        min: today.day.mintemp_c,
        max: today.day.maxtemp_c,
        hourly_forecast: today
            .hour
            .iter()
            .take(MAX_HOURLY_POINTS)
            .map(|h| HourlyTemperature {
                time: display_time(&h.time),
                temp: h.temp_c,
                feels_like: h.feelslike_c,
            })
            .collect(),
    })
}

pub fn wind_from_forecast(forecast: &Forecast) -> Result<WindData, UpstreamError> {
    let today = first_day(forecast)?;
    let current = &forecast.snapshot.current;

    Ok(WindData {
        speed: current.wind_kph,
        direction: current.wind_dir.clone(),
        degree: current.wind_degree,
        gust: current.gust_kph,
        level: WindLevel::from_kph(current.wind_kph),
        hourly_forecast: today
            .hour
            .iter()
            .take(MAX_HOURLY_POINTS)
            .map(|h| HourlyWind {
                time: display_time(&h.time),
                speed: h.wind_kph,
                direction: h.wind_dir.clone(),
                degree: h.wind_degree,
            })
            .collect(),
    })
}

pub fn humidity_from_forecast(forecast: &Forecast) -> Result<HumidityData, UpstreamError> {
    let today = first_day(forecast)?;
    let current = &forecast.snapshot.current;

    Ok(HumidityData {
        current: current.humidity,
        level: HumidityLevel::from_percent(current.humidity as f64),
        hourly_forecast: today
            .hour
            .iter()
            .take(MAX_HOURLY_POINTS)
            .map(|h| HourlyHumidity {
                time: display_time(&h.time),
                humidity: h.humidity,
            })
            .collect(),
    })
}

pub fn overview_from_snapshot(snapshot: WeatherSnapshot) -> OverviewData {
    let current = &snapshot.current;
    OverviewData {
        humidity_level: HumidityLevel::from_percent(current.humidity as f64),
        wind_level: WindLevel::from_kph(current.wind_kph),
        uv_level: UvLevel::from_index(current.uv),
        snapshot,
    }
}

pub async fn get_temperature_data<A: WeatherApi>(
    api: &A,
    city: &str,
) -> Result<TemperatureData, UpstreamError> {
    let forecast = api.fetch_forecast(city, 1).await?;
    temperature_from_forecast(&forecast)
}

pub async fn get_wind_data<A: WeatherApi>(api: &A, city: &str) -> Result<WindData, UpstreamError> {
    let forecast = api.fetch_forecast(city, 1).await?;
    wind_from_forecast(&forecast)
}

pub async fn get_humidity_data<A: WeatherApi>(
    api: &A,
    city: &str,
) -> Result<HumidityData, UpstreamError> {
    let forecast = api.fetch_forecast(city, 1).await?;
    humidity_from_forecast(&forecast)
}

pub async fn get_overview_data<A: WeatherApi>(
    api: &A,
    city: &str,
) -> Result<OverviewData, UpstreamError> {
    let snapshot = api.fetch_current(city).await?;
    Ok(overview_from_snapshot(snapshot))
}
