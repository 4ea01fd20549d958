//! Shared services for the dashboard.
//!
//! Holds the runtime handle, the weather client, the weather service channel
//! and the shutdown token. Outstanding view loads listen on a child of the
//! shutdown token and are dropped when it fires.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use skydash_core::{Config, ConfigError};
use skydash_weather::{LocationSource, WeatherApi, WeatherClient};

use crate::services::{ViewRequest, WeatherError, WeatherServiceMessage};

pub struct AppServices<A> {
    /// Handle used to spawn network work
    runtime: tokio::runtime::Handle,

    /// Cancelled once on shutdown
    shutdown: CancellationToken,

    weather_api: Arc<A>,

    weather_service_tx: Sender<WeatherServiceMessage>,
    weather_service_rx: Mutex<Receiver<WeatherServiceMessage>>,
}

impl AppServices<WeatherClient> {
    /// Build services around a real provider client.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(runtime: tokio::runtime::Handle, config: &Config) -> Result<Self> {
        let api_key = config.weather.api_key.clone().ok_or_else(|| {
            ConfigError::MissingSetting(
                "weather.api_key (or SKYDASH_WEATHER_API_KEY / WEATHER_API_KEY)".into(),
            )
        })?;
        let client = WeatherClient::new(api_key, &config.weather)
            .context("Failed to create weather client")?;

        tracing::info!("Weather client initialized with base_url: {}", client.base_url());
        Ok(Self::new(runtime, Arc::new(client)))
    }
}

impl<A: WeatherApi + LocationSource + 'static> AppServices<A> {
    pub fn new(runtime: tokio::runtime::Handle, weather_api: Arc<A>) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            runtime,
            shutdown: CancellationToken::new(),
            weather_api,
            weather_service_tx: tx,
            weather_service_rx: Mutex::new(rx),
        }
    }

    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.clone()
    }

    pub fn weather_api(&self) -> Arc<A> {
        self.weather_api.clone()
    }

    /// Start loading a page. The result arrives via `try_recv_weather_message`.
    pub fn request_view(&self, request: ViewRequest) {
        if self.shutdown.is_cancelled() {
            let _ = self
                .weather_service_tx
                .send(WeatherServiceMessage::ViewLoaded {
                    request_id: request.id,
                    result: Err(WeatherError::NotInitialized),
                });
            return;
        }

        crate::services::request_weather_view(
            &self.weather_service_tx,
            &self.runtime,
            self.weather_api.clone(),
            request,
            self.shutdown.child_token(),
        );
    }

    /// Try to receive a message from the weather service channel (non-blocking).
    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().try_recv().ok()
    }

    /// Cancel every outstanding load. Later requests fail immediately.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl<A> std::fmt::Debug for AppServices<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("shut_down", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}
