pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod prefs;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ApiKey, Config, SearchConfig, UiConfig, ValidationResult, WeatherConfig};
pub use debounce::Debouncer;
pub use error::{AppError, ConfigError, NetworkError, StorageError};
pub use prefs::{FilePreferences, KeyValueStore, MemoryPreferences};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("SkyDash core initialized");
    Ok(())
}
