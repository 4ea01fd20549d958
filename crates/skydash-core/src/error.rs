//! Centralized error types for SkyDash.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Weather provider failures mapped in from the weather crate.
    #[error("Weather service error: {message}")]
    Weather {
        message: String,
        user_message: &'static str,
    },
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Weather { user_message, .. } => user_message,
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "Request timeout - please check your connection.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Local preference storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read preferences: {0}")]
    Read(String),

    #[error("Failed to write preferences: {0}")]
    Write(String),

    #[error("Preferences file is corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Read(_) => "Unable to load saved preferences. Using defaults.",
            StorageError::Write(_) => "Failed to save preferences. Please try again.",
            StorageError::Corrupted(_) => "Saved preferences were unreadable and have been reset.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let config_err = ConfigError::MissingSetting("weather.api_key".into());
        let app_err: AppError = config_err.into();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingSetting(_))
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Network(NetworkError::Timeout);
        assert_eq!(
            app_err.user_message(),
            "Request timeout - please check your connection."
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let app_err: AppError = StorageError::Write("disk full".into()).into();
        assert!(matches!(app_err, AppError::Storage(StorageError::Write(_))));
        assert_eq!(
            app_err.user_message(),
            "Failed to save preferences. Please try again."
        );
    }

    #[test]
    fn test_weather_error_keeps_user_message() {
        let app_err = AppError::Weather {
            message: "401 Unauthorized".into(),
            user_message: "Invalid API key",
        };
        assert_eq!(app_err.user_message(), "Invalid API key");
        assert!(app_err.to_string().contains("401"));
    }

    #[test]
    fn test_user_messages_are_non_empty() {
        let messages = [
            NetworkError::Timeout.user_message(),
            ConfigError::Invalid("x".into()).user_message(),
            StorageError::Write("x".into()).user_message(),
        ];
        assert!(messages.iter().all(|m| !m.is_empty()));
    }
}
