//! Dashboard state for SkyDash: layout, theming, navigation and the
//! composition root a renderer binds to.

pub mod app_services;
pub mod breakpoint;
pub mod dashboard;
pub mod drawer;
mod error_mapping;
pub mod routes;
pub mod services;
pub mod sidebar;
pub mod theme;

pub use app_services::AppServices;
pub use breakpoint::{Breakpoint, BreakpointWatcher, Viewport, WindowSize};
pub use dashboard::{Dashboard, HostEnvironment, SearchBarView, ViewState};
pub use drawer::{BodyStyle, Drawer, MemorySurface, ScrollLock, ScrollSurface};
pub use routes::{breadcrumbs, Breadcrumb, Route};
pub use services::{ViewData, WeatherError};
pub use sidebar::SidebarState;
pub use theme::{ThemeMode, ThemePalette, ThemeState};
