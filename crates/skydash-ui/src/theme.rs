//! Light/dark theme selection and palettes.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use skydash_core::{AppError, KeyValueStore};

pub const THEME_MODE_KEY: &str = "themeMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn palette(&self) -> &'static ThemePalette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
}

pub const LIGHT_PALETTE: ThemePalette = ThemePalette {
    primary: "#6366f1",
    secondary: "#3b82f6",
    accent: "#8b5cf6",
    background: "#f3f4f6",
    surface: "#ffffff",
    text: "#374151",
};

pub const DARK_PALETTE: ThemePalette = ThemePalette {
    primary: "#818cf8",
    secondary: "#60a5fa",
    accent: "#a78bfa",
    background: "#111827",
    surface: "#1f2937",
    text: "#f9fafb",
};

/// Current theme, backed by the preference store.
pub struct ThemeState {
    mode: ThemeMode,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeState {
    /// Saved mode wins, then the platform preference, then light.
    pub fn load(store: Arc<dyn KeyValueStore>, prefers_dark: bool) -> Self {
        let saved = store.get(THEME_MODE_KEY).and_then(|v| v.parse().ok());
        let mode = saved.unwrap_or(if prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        });
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &'static ThemePalette {
        self.mode.palette()
    }

    /// Flip the mode and persist it. A failed write keeps the new mode for
    /// this session and is reported to the caller.
    pub fn toggle(&mut self) -> Result<ThemeMode, AppError> {
        self.mode = self.mode.toggled();
        self.store
            .set(THEME_MODE_KEY, self.mode.as_str())
            .map_err(|e| {
                tracing::warn!("Failed to save theme mode: {}", e);
                AppError::from(e)
            })?;
        Ok(self.mode)
    }
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState").field("mode", &self.mode).finish()
    }
}
