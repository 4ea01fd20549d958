//! Threshold classifiers for humidity, wind speed and UV index.
//!
//! Every classifier is total over `f64` and monotonic: a larger reading never
//! maps to a lower level. `NaN` falls through to the top bucket.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HumidityLevel {
    Dry,
    Normal,
    Humid,
    VeryHumid,
}

impl HumidityLevel {
    pub fn from_percent(humidity: f64) -> Self {
        if humidity < 30.0 {
            Self::Dry
        } else if humidity < 50.0 {
            Self::Normal
        } else if humidity < 70.0 {
            Self::Humid
        } else {
            Self::VeryHumid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Normal => "Normal",
            Self::Humid => "Humid",
            Self::VeryHumid => "Very humid",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Dry => "#f44336",
            Self::Normal => "#ff9800",
            Self::Humid => "#4caf50",
            Self::VeryHumid => "#2196f3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Dry => "Dry air, may dry out skin and nasal passages",
            Self::Normal => "Comfortable humidity for the body",
            Self::Humid => "Humid air, may feel slightly muggy",
            Self::VeryHumid => "Very humid, may feel sticky and oppressive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindLevel {
    Calm,
    Light,
    LightToModerate,
    Moderate,
    Strong,
    VeryStrong,
    Storm,
}

impl WindLevel {
    pub fn from_kph(speed: f64) -> Self {
        if speed < 1.0 {
            Self::Calm
        } else if speed < 6.0 {
            Self::Light
        } else if speed < 12.0 {
            Self::LightToModerate
        } else if speed < 20.0 {
            Self::Moderate
        } else if speed < 29.0 {
            Self::Strong
        } else if speed < 39.0 {
            Self::VeryStrong
        } else {
            Self::Storm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Light => "Light breeze",
            Self::LightToModerate => "Light to moderate",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very strong",
            Self::Storm => "Storm",
        }
    }

    // Calm and Light share a color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Calm | Self::Light => "#4caf50",
            Self::LightToModerate => "#8bc34a",
            Self::Moderate => "#ffeb3b",
            Self::Strong => "#ff9800",
            Self::VeryStrong => "#f44336",
            Self::Storm => "#9c27b0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv: f64) -> Self {
        if uv <= 2.0 {
            Self::Low
        } else if uv <= 5.0 {
            Self::Moderate
        } else if uv <= 7.0 {
            Self::High
        } else if uv <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very high",
            Self::Extreme => "Extreme",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#4caf50",
            Self::Moderate => "#ff9800",
            Self::High => "#f44336",
            Self::VeryHigh => "#9c27b0",
            Self::Extreme => "#d32f2f",
        }
    }
}

/// Full name for a 16-point compass abbreviation. Unknown input is returned as is.
pub fn compass_name(abbrev: &str) -> &str {
    match abbrev.trim() {
        "N" => "North",
        "NNE" => "North-Northeast",
        "NE" => "Northeast",
        "ENE" => "East-Northeast",
        "E" => "East",
        "ESE" => "East-Southeast",
        "SE" => "Southeast",
        "SSE" => "South-Southeast",
        "S" => "South",
        "SSW" => "South-Southwest",
        "SW" => "Southwest",
        "WSW" => "West-Southwest",
        "W" => "West",
        "WNW" => "West-Northwest",
        "NW" => "Northwest",
        "NNW" => "North-Northwest",
        _ => abbrev,
    }
}
