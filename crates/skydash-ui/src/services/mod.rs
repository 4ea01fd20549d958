pub mod weather_service;

pub use weather_service::{
    load_view, request_view as request_weather_view, ViewData, ViewRequest, WeatherError,
    WeatherServiceMessage,
};
