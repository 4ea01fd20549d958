use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use skydash_core::{Config, FilePreferences};
use skydash_ui::{
    AppServices, Dashboard, HostEnvironment, MemorySurface, Route, ViewData, ViewState,
    WindowSize,
};
use skydash_weather::{compass_name, WeatherClient};

const USAGE: &str = "usage: skydash [overview|temperature|wind|humidity] [CITY...]\n       skydash search QUERY";

/// Upper bound on how long the terminal front end waits for one page
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    skydash_core::init()?;

    let (config, _) = Config::load_validated()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("search") {
        return run_search(&config, &args[1..].join(" ")).await;
    }

    let (route, city_args) = match args.first().and_then(|a| Route::parse(a)) {
        Some(route) => (route, &args[1..]),
        None => (Route::Overview, &args[..]),
    };
    if city_args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let services = AppServices::from_config(tokio::runtime::Handle::current(), &config)?;
    let host = HostEnvironment {
        preferences: Arc::new(FilePreferences::open(config.preferences_path())),
        surface: Arc::new(MemorySurface::new()),
        prefers_dark: false,
        window_size: WindowSize::default(),
    };
    let mut dashboard = Dashboard::new(services, &config, host);

    if !city_args.is_empty() {
        dashboard.submit_search(&city_args.join(" "));
    }
    dashboard.navigate(route);

    let state = wait_for_view(&mut dashboard).await?;
    print_view(dashboard.city(), &state)?;

    dashboard.services().shutdown();
    Ok(())
}

async fn run_search(config: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("{}", USAGE);
    }

    let api_key = config
        .weather
        .api_key
        .clone()
        .context("No weather API key configured")?;
    let client = WeatherClient::new(api_key, &config.weather)?;

    let results = client.search_locations(query).await;
    if results.is_empty() {
        println!("No locations match \"{}\"", query.trim());
    }
    for location in results {
        println!(
            "{:<40} {:>8.2} {:>8.2}",
            location.display_name(),
            location.lat,
            location.lon
        );
    }
    Ok(())
}

async fn wait_for_view(dashboard: &mut Dashboard<WeatherClient>) -> Result<ViewState> {
    let poll = async {
        loop {
            dashboard.poll();
            if !dashboard.view_state().is_loading() {
                return dashboard.view_state().clone();
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    };

    tokio::time::timeout(LOAD_TIMEOUT, poll)
        .await
        .context("Timed out waiting for weather data")
}

fn print_view(city: &str, state: &ViewState) -> Result<()> {
    let data = match state {
        ViewState::Loaded(data) => data,
        ViewState::Error(message) => bail!("{}", message),
        ViewState::Idle | ViewState::Loading => bail!("No data loaded for {}", city),
    };

    println!("{} - {}", data.route().title(), city);
    match data {
        ViewData::Overview(overview) => {
            let location = &overview.snapshot.location;
            let current = &overview.snapshot.current;
            println!("{}, {} ({})", location.name, location.country, location.localtime);
            println!("  {}", current.condition.text);
            println!(
                "  Temperature  {:.1}°C (feels like {:.1}°C)",
                current.temp_c, current.feelslike_c
            );
            println!(
                "  Humidity     {}% ({})",
                current.humidity,
                overview.humidity_level.label()
            );
            println!(
                "  Wind         {:.1} km/h {} ({})",
                current.wind_kph,
                compass_name(&current.wind_dir),
                overview.wind_level.label()
            );
            println!("  UV index     {:.0} ({})", current.uv, overview.uv_level.label());
        }
        ViewData::Temperature(temp) => {
            println!(
                "  Now {:.1}°C, feels like {:.1}°C, range {:.1}..{:.1}°C",
                temp.current, temp.feels_like, temp.min, temp.max
            );
            for hour in &temp.hourly_forecast {
                println!("  {}  {:>5.1}°C  feels {:>5.1}°C", hour.time, hour.temp, hour.feels_like);
            }
        }
        ViewData::Wind(wind) => {
            let gust = wind
                .gust
                .map(|g| format!(", gusts {:.1} km/h", g))
                .unwrap_or_default();
            println!(
                "  Now {:.1} km/h from {} ({}°){} - {}",
                wind.speed,
                compass_name(&wind.direction),
                wind.degree,
                gust,
                wind.level.label()
            );
            for hour in &wind.hourly_forecast {
                println!(
                    "  {}  {:>5.1} km/h  {:<3} {:>3}°",
                    hour.time, hour.speed, hour.direction, hour.degree
                );
            }
        }
        ViewData::Humidity(humidity) => {
            println!(
                "  Now {}% - {}: {}",
                humidity.current,
                humidity.level.label(),
                humidity.level.description()
            );
            for hour in &humidity.hourly_forecast {
                println!("  {}  {:>3}%", hour.time, hour.humidity);
            }
        }
    }
    Ok(())
}
