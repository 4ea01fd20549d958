//! Dashboard composition root.
//!
//! Owns the active city and page, the search box, and the layout state
//! (drawer, theme, sidebar, viewport). Everything is mutated from one owner;
//! async results come back through `poll`.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use skydash_core::{AppError, Config, KeyValueStore};
use skydash_weather::{LocationSearch, LocationSource, SearchLocation, SearchState, WeatherApi};

use crate::app_services::AppServices;
use crate::breakpoint::{BreakpointWatcher, Viewport, WindowSize};
use crate::drawer::{Drawer, ScrollSurface};
use crate::routes::{breadcrumbs, Breadcrumb, Route};
use crate::services::{ViewData, ViewRequest, WeatherError, WeatherServiceMessage};
use crate::sidebar::SidebarState;
use crate::theme::{ThemeMode, ThemeState};

/// What the current page shows. Exactly one of these at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded(ViewData),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Host-provided pieces the dashboard cannot create itself
pub struct HostEnvironment {
    pub preferences: Arc<dyn KeyValueStore>,
    pub surface: Arc<dyn ScrollSurface>,
    pub prefers_dark: bool,
    pub window_size: WindowSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBarView {
    pub query: String,
    pub suggestions: Vec<String>,
    pub is_loading: bool,
}

pub struct Dashboard<A: WeatherApi + LocationSource + 'static> {
    services: AppServices<A>,
    city: String,
    route: Route,
    view_state: ViewState,
    next_request_id: u64,
    pending_request: Option<u64>,
    search: LocationSearch<A>,
    viewport: BreakpointWatcher,
    viewport_rx: watch::Receiver<Viewport>,
    drawer: Drawer,
    theme: ThemeState,
    sidebar: SidebarState,
    /// Last preference failure, shown until the next successful save
    notice: Option<String>,
}

impl<A: WeatherApi + LocationSource + 'static> Dashboard<A> {
    pub fn new(services: AppServices<A>, config: &Config, host: HostEnvironment) -> Self {
        let viewport = BreakpointWatcher::from_config(host.window_size, &config.ui);
        let viewport_rx = viewport.subscribe();
        let breakpoint = viewport.current().breakpoint;

        Self {
            search: LocationSearch::new(services.weather_api(), &config.search),
            drawer: Drawer::new(
                breakpoint,
                host.surface,
                config.ui.swipe_close_threshold_px,
            ),
            theme: ThemeState::load(host.preferences.clone(), host.prefers_dark),
            sidebar: SidebarState::load(host.preferences),
            city: config.weather.default_city.clone(),
            route: Route::Overview,
            view_state: ViewState::Idle,
            next_request_id: 0,
            pending_request: None,
            notice: None,
            viewport,
            viewport_rx,
            services,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(self.route.path())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut Drawer {
        &mut self.drawer
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        let result = self.theme.toggle().map(|_| ());
        self.record_preference_result(result);
        self.theme.mode()
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        let result = self.sidebar.toggle().map(|_| ());
        self.record_preference_result(result);
        self.sidebar.is_expanded()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn record_preference_result(&mut self, result: Result<(), AppError>) {
        self.notice = result.err().map(|e| e.user_message().to_string());
    }

    pub fn services(&self) -> &AppServices<A> {
        &self.services
    }

    // =========== Search ===========

    /// Keystroke in the search box.
    pub fn set_search_text(&mut self, text: &str) {
        self.search.set_query(text);
    }

    pub fn search_state(&self) -> SearchState {
        self.search.snapshot()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub fn search_bar(&self) -> SearchBarView {
        let state = self.search.snapshot();
        SearchBarView {
            query: state.search_query,
            suggestions: state.suggestions.iter().map(|s| s.display_name()).collect(),
            is_loading: state.is_loading,
        }
    }

    /// Commit a suggestion as the active city.
    pub fn select_suggestion(&mut self, location: &SearchLocation) {
        self.search.clear_suggestions();
        self.set_city(location.display_name());
    }

    /// Enter in the search box. Blank input is ignored.
    pub fn submit_search(&mut self, text: &str) -> bool {
        let city = text.trim();
        if city.is_empty() {
            return false;
        }
        self.search.clear_suggestions();
        self.set_city(city.to_string());
        true
    }

    // =========== Navigation ===========

    pub fn set_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        if city == self.city && !matches!(self.view_state, ViewState::Idle) {
            return;
        }
        tracing::info!("Active city: {}", city);
        self.city = city;
        self.reload();
    }

    pub fn navigate(&mut self, route: Route) {
        if route == self.route && !matches!(self.view_state, ViewState::Idle) {
            return;
        }
        self.route = route;
        self.drawer.on_route_change();
        self.reload();
    }

    /// Issue a fresh load for the current city and page.
    pub fn reload(&mut self) {
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.pending_request = Some(id);
        self.view_state = ViewState::Loading;

        self.services.request_view(ViewRequest {
            id,
            city: self.city.clone(),
            route: self.route,
        });
    }

    // =========== Layout ===========

    pub fn on_resize(&mut self, size: WindowSize) {
        self.viewport.resize(size);
    }

    /// Apply finished loads and settled viewport changes.
    ///
    /// Returns `true` if anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Some(message) = self.services.try_recv_weather_message() {
            match message {
                WeatherServiceMessage::ViewLoaded { request_id, result } => {
                    if self.pending_request != Some(request_id) {
                        tracing::debug!("Dropping superseded view result {}", request_id);
                        continue;
                    }
                    self.pending_request = None;
                    self.view_state = match result {
                        Ok(data) => ViewState::Loaded(data),
                        Err(e) => ViewState::Error(error_text(e)),
                    };
                    changed = true;
                }
            }
        }

        if self.viewport_rx.has_changed().unwrap_or(false) {
            let viewport = *self.viewport_rx.borrow_and_update();
            self.drawer.on_breakpoint_change(viewport.breakpoint);
            changed = true;
        }

        changed
    }
}

/// User-facing text for a failed load, with the provider's own explanation
/// when it gave one.
fn error_text(e: WeatherError) -> String {
    let detail = e.provider_message().map(str::to_string);
    let message = AppError::from(e).user_message();
    match detail {
        Some(detail) => format!("{} ({})", message, detail),
        None => message.to_string(),
    }
}

impl<A: WeatherApi + LocationSource + 'static> std::fmt::Debug for Dashboard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("city", &self.city)
            .field("route", &self.route)
            .field("view_state", &self.view_state)
            .field("drawer", &self.drawer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use parking_lot::Mutex;
    use skydash_core::{FilePreferences, MemoryPreferences};
    use skydash_weather::{
        Condition, CurrentConditions, DaySummary, Forecast, ForecastDay, HourSample, Location,
        SearchPhase, UpstreamError, WeatherSnapshot,
    };

    use crate::breakpoint::Breakpoint;
    use crate::drawer::{BodyStyle, MemorySurface};

    /// Answers any city, slower for the ones listed in `delays`.
    struct FakeApi {
        delays: Vec<(&'static str, Duration)>,
        fail_with_quota: bool,
        unknown_city: Option<&'static str>,
        forecast_calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                delays: Vec::new(),
                fail_with_quota: false,
                unknown_city: None,
                forecast_calls: Mutex::new(Vec::new()),
            }
        }

        fn delay_for(&self, city: &str) -> Duration {
            self.delays
                .iter()
                .find(|(c, _)| *c == city)
                .map(|(_, d)| *d)
                .unwrap_or(Duration::from_millis(10))
        }

        fn failure(&self, city: &str) -> Option<UpstreamError> {
            if self.fail_with_quota {
                return Some(UpstreamError::QuotaExceeded);
            }
            (self.unknown_city == Some(city)).then(|| UpstreamError::Api {
                status: 400,
                message: "No matching location found.".to_string(),
            })
        }

        fn humidity_for(city: &str) -> u8 {
            match city {
                "Paris" => 71,
                "Tokyo" => 48,
                _ => 55,
            }
        }

        fn snapshot(city: &str) -> WeatherSnapshot {
            WeatherSnapshot {
                location: Location {
                    name: city.to_string(),
                    region: String::new(),
                    country: String::new(),
                    lat: 0.0,
                    lon: 0.0,
                    tz_id: String::new(),
                    localtime_epoch: 0,
                    localtime: String::new(),
                },
                current: CurrentConditions {
                    last_updated_epoch: 0,
                    last_updated: String::new(),
                    temp_c: 31.0,
                    temp_f: 87.8,
                    is_day: 1,
                    condition: Condition::default(),
                    wind_kph: 9.0,
                    wind_degree: 90,
                    wind_dir: "E".to_string(),
                    gust_kph: None,
                    pressure_mb: 1010.0,
                    humidity: Self::humidity_for(city),
                    cloud: 10,
                    feelslike_c: 35.0,
                    feelslike_f: 95.0,
                    uv: 4.0,
                    vis_km: 10.0,
                },
            }
        }
    }

    impl WeatherApi for FakeApi {
        async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError> {
            tokio::time::sleep(self.delay_for(city)).await;
            if let Some(e) = self.failure(city) {
                return Err(e);
            }
            Ok(Self::snapshot(city))
        }

        async fn fetch_forecast(&self, city: &str, _days: u8) -> Result<Forecast, UpstreamError> {
            self.forecast_calls.lock().push(city.to_string());
            tokio::time::sleep(self.delay_for(city)).await;
            if let Some(e) = self.failure(city) {
                return Err(e);
            }
            Ok(Forecast {
                snapshot: Self::snapshot(city),
                days: vec![ForecastDay {
                    date: "2025-07-05".to_string(),
                    date_epoch: 0,
                    day: DaySummary {
                        maxtemp_c: 34.0,
                        maxtemp_f: 0.0,
                        mintemp_c: 26.0,
                        mintemp_f: 0.0,
                        avgtemp_c: 30.0,
                        avgtemp_f: 0.0,
                        maxwind_kph: 15.0,
                        totalprecip_mm: 0.0,
                        avghumidity: 60.0,
                        condition: Condition::default(),
                        uv: 6.0,
                    },
                    hour: vec![HourSample {
                        time_epoch: 0,
                        time: "2025-07-05 06:00".to_string(),
                        temp_c: 27.0,
                        temp_f: 0.0,
                        condition: Condition::default(),
                        wind_kph: 5.0,
                        wind_degree: 90,
                        wind_dir: "E".to_string(),
                        humidity: 80,
                        feelslike_c: 29.0,
                        feelslike_f: 0.0,
                        uv: 0.0,
                    }],
                }],
            })
        }
    }

    impl LocationSource for FakeApi {
        async fn search_locations(&self, query: &str) -> Vec<SearchLocation> {
            if query != "ban" {
                return Vec::new();
            }
            ["Bangkok|Thailand", "Bandung|Indonesia"]
                .iter()
                .filter_map(|entry| entry.split_once('|'))
                .map(|(name, country)| SearchLocation {
                    id: 0,
                    name: name.to_string(),
                    region: String::new(),
                    country: country.to_string(),
                    lat: 0.0,
                    lon: 0.0,
                    url: String::new(),
                })
                .collect()
        }
    }

    fn dashboard(api: FakeApi, width: u32) -> (Dashboard<FakeApi>, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let services = AppServices::new(tokio::runtime::Handle::current(), Arc::new(api));
        let host = HostEnvironment {
            preferences: Arc::new(MemoryPreferences::new()),
            surface: surface.clone(),
            prefers_dark: false,
            window_size: WindowSize::new(width, 800),
        };
        (Dashboard::new(services, &Config::default(), host), surface)
    }

    async fn settle(dashboard: &mut Dashboard<FakeApi>) {
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            dashboard.poll();
            if !dashboard.view_state().is_loading() {
                return;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_idle_on_default_city() {
        let (dashboard, _) = dashboard(FakeApi::new(), 1280);
        assert_eq!(dashboard.city(), "Bangkok");
        assert_eq!(dashboard.route(), Route::Overview);
        assert_eq!(dashboard.view_state(), &ViewState::Idle);
        assert_eq!(dashboard.viewport().breakpoint, Breakpoint::Desktop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_loads_page_data() {
        let (mut dashboard, _) = dashboard(FakeApi::new(), 1280);

        dashboard.navigate(Route::Temperature);
        assert!(dashboard.view_state().is_loading());
        settle(&mut dashboard).await;

        match dashboard.view_state() {
            ViewState::Loaded(ViewData::Temperature(data)) => {
                assert_eq!(data.max, 34.0);
                assert_eq!(data.hourly_forecast[0].time, "06:00");
            }
            other => panic!("unexpected state: {:?}", other),
        }
        let names: Vec<String> = dashboard.breadcrumbs().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Overview", "Temperature"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_then_select_sets_city_and_clears() {
        let (mut dashboard, _) = dashboard(FakeApi::new(), 1280);

        dashboard.set_search_text("ban");
        tokio::time::sleep(Duration::from_millis(400)).await;

        let bar = dashboard.search_bar();
        assert_eq!(bar.suggestions, vec!["Bangkok, Thailand", "Bandung, Indonesia"]);

        let first = dashboard.search_state().suggestions[0].clone();
        dashboard.select_suggestion(&first);

        assert_eq!(dashboard.city(), "Bangkok, Thailand");
        assert!(dashboard.search_state().suggestions.is_empty());
        assert_eq!(dashboard.search_state().phase, SearchPhase::Idle);
        assert!(dashboard.view_state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_search_trims_and_ignores_blank() {
        let (mut dashboard, _) = dashboard(FakeApi::new(), 1280);

        assert!(!dashboard.submit_search("   "));
        assert_eq!(dashboard.city(), "Bangkok");

        assert!(dashboard.submit_search("  Chiang Mai "));
        assert_eq!(dashboard.city(), "Chiang Mai");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_result_is_discarded() {
        let mut api = FakeApi::new();
        api.delays = vec![("Paris", Duration::from_millis(500))];
        let (mut dashboard, _) = dashboard(api, 1280);

        dashboard.navigate(Route::Humidity);
        dashboard.set_city("Paris");
        dashboard.set_city("Tokyo");
        settle(&mut dashboard).await;

        // Let the slow Paris response arrive too
        tokio::time::sleep(Duration::from_millis(600)).await;
        dashboard.poll();

        match dashboard.view_state() {
            ViewState::Loaded(ViewData::Humidity(data)) => {
                assert_eq!(data.current, FakeApi::humidity_for("Tokyo"));
                assert_ne!(data.current, FakeApi::humidity_for("Paris"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(dashboard.city(), "Tokyo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_becomes_error_state() {
        let mut api = FakeApi::new();
        api.fail_with_quota = true;
        let (mut dashboard, _) = dashboard(api, 1280);

        dashboard.navigate(Route::Wind);
        settle(&mut dashboard).await;

        assert_eq!(
            dashboard.view_state(),
            &ViewState::Error(UpstreamError::QuotaExceeded.user_message().to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_explanation_is_shown() {
        let mut api = FakeApi::new();
        api.unknown_city = Some("Atlantis");
        let (mut dashboard, _) = dashboard(api, 1280);

        dashboard.set_city("Atlantis");
        settle(&mut dashboard).await;

        match dashboard.view_state() {
            ViewState::Error(text) => {
                assert!(text.starts_with("Failed to fetch weather data"));
                assert!(text.ends_with("(No matching location found.)"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_preference_save_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let services =
            AppServices::new(tokio::runtime::Handle::current(), Arc::new(FakeApi::new()));
        let host = HostEnvironment {
            preferences: Arc::new(FilePreferences::open(blocker.join("preferences.json"))),
            surface: Arc::new(MemorySurface::new()),
            prefers_dark: false,
            window_size: WindowSize::new(1280, 800),
        };
        let mut dashboard = Dashboard::new(services, &Config::default(), host);

        assert_eq!(dashboard.toggle_theme(), ThemeMode::Dark);
        assert_eq!(
            dashboard.notice(),
            Some("Failed to save preferences. Please try again.")
        );
        assert!(!dashboard.toggle_sidebar());
        assert!(dashboard.notice().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_save_clears_notice() {
        let (mut dashboard, _) = dashboard(FakeApi::new(), 1280);
        assert_eq!(dashboard.toggle_theme(), ThemeMode::Dark);
        assert!(!dashboard.toggle_sidebar());
        assert_eq!(dashboard.notice(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_route_change_closes_drawer() {
        let (mut dashboard, surface) = dashboard(FakeApi::new(), 375);

        assert!(dashboard.drawer_mut().open());
        assert!(dashboard.drawer().is_scroll_locked());

        dashboard.navigate(Route::Wind);
        assert!(!dashboard.drawer().is_open());
        assert_eq!(surface.body_style(), BodyStyle::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_to_desktop_closes_drawer() {
        let (mut dashboard, _) = dashboard(FakeApi::new(), 800);
        dashboard.drawer_mut().open();

        dashboard.on_resize(WindowSize::new(1440, 900));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(dashboard.poll());

        assert_eq!(dashboard.viewport().breakpoint, Breakpoint::Desktop);
        assert!(!dashboard.drawer().is_open());
    }
}
