use crate::services::weather_service::WeatherError as UiWeatherError;
use skydash_core::{AppError, ConfigError, NetworkError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Connection(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            UiWeatherError::Timeout => AppError::Network(NetworkError::Timeout),
            UiWeatherError::Upstream {
                message,
                user_message,
                ..
            } => AppError::Weather {
                message,
                user_message,
            },
            UiWeatherError::NotInitialized => {
                AppError::Config(ConfigError::MissingSetting("weather API key".into()))
            }
        }
    }
}
