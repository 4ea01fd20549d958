use serde::{Deserialize, Serialize};

/// Provider condition descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    #[serde(default)]
    pub code: i32,
}

/// Resolved location as reported alongside current/forecast payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    #[serde(default)]
    pub localtime_epoch: i64,
    #[serde(default)]
    pub localtime: String,
}

/// Current conditions block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub last_updated_epoch: i64,
    #[serde(default)]
    pub last_updated: String,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: f64,
    #[serde(default)]
    pub is_day: u8,
    #[serde(default)]
    pub condition: Condition,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: u16,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub gust_kph: Option<f64>,
    #[serde(default)]
    pub pressure_mb: f64,
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub feelslike_f: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub vis_km: f64,
}

/// Current conditions for one location, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
}

/// One day's aggregate values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    #[serde(default)]
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub mintemp_f: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    #[serde(default)]
    pub avgtemp_f: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub uv: f64,
}

/// One hourly sample within a forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSample {
    #[serde(default)]
    pub time_epoch: i64,
    /// Provider-local time, `YYYY-MM-DD HH:MM`
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: f64,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: u16,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub feelslike_f: f64,
    #[serde(default)]
    pub uv: f64,
}

/// One calendar day of forecast data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(default)]
    pub date_epoch: i64,
    pub day: DaySummary,
    #[serde(default)]
    pub hour: Vec<HourSample>,
}

/// Snapshot plus the ordered forecast days returned with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub snapshot: WeatherSnapshot,
    pub days: Vec<ForecastDay>,
}

impl Forecast {
    /// Day 0 of the forecast, if the provider returned any days
    pub fn today(&self) -> Option<&ForecastDay> {
        self.days.first()
    }
}

/// Autocomplete result from the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocation {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub url: String,
}

impl SearchLocation {
    /// Name used when the location is committed as the active city
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

// Raw response envelopes. Every top-level field is optional so that a body
// missing one of them is reported as an invalid response instead of a
// generic parse error.

#[derive(Debug, Deserialize)]
pub(crate) struct RawCurrentResponse {
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawForecastResponse {
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<RawForecastBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawForecastBlock {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// Provider error body, e.g. `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    #[allow(dead_code)]
    pub code: i64,
    pub message: String,
}
