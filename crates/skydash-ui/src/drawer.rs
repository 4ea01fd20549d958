//! Navigation drawer for small viewports.
//!
//! The drawer can only be opened on mobile and tablet layouts. While it is
//! open on mobile the page body is scroll-locked; the previous body style is
//! captured on lock and written back verbatim on release.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::breakpoint::Breakpoint;

/// Overlay fades to half opacity over this drag distance
const SWIPE_FADE_DISTANCE_PX: f64 = 200.0;

/// Inline style properties the scroll lock touches
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyStyle {
    pub overflow: String,
    pub position: String,
    pub width: String,
}

impl BodyStyle {
    pub fn locked() -> Self {
        Self {
            overflow: "hidden".to_string(),
            position: "fixed".to_string(),
            width: "100%".to_string(),
        }
    }
}

/// Whatever hosts the page body.
pub trait ScrollSurface: Send + Sync {
    fn body_style(&self) -> BodyStyle;

    fn set_body_style(&self, style: BodyStyle);
}

/// In-process surface for headless front ends and tests
#[derive(Debug, Default)]
pub struct MemorySurface {
    style: Mutex<BodyStyle>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: BodyStyle) -> Self {
        Self {
            style: Mutex::new(style),
        }
    }
}

impl ScrollSurface for MemorySurface {
    fn body_style(&self) -> BodyStyle {
        self.style.lock().clone()
    }

    fn set_body_style(&self, style: BodyStyle) {
        *self.style.lock() = style;
    }
}

/// Holds the body scroll lock; dropping it restores the captured style.
pub struct ScrollLock {
    surface: Arc<dyn ScrollSurface>,
    previous: BodyStyle,
}

impl ScrollLock {
    pub fn acquire(surface: Arc<dyn ScrollSurface>) -> Self {
        let previous = surface.body_style();
        surface.set_body_style(BodyStyle::locked());
        Self { surface, previous }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.surface
            .set_body_style(std::mem::take(&mut self.previous));
    }
}

impl std::fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLock")
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Explicit,
    RouteChange,
    Desktop,
    Escape,
    Overlay,
    Swipe,
}

/// Visual feedback while a close swipe is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFeedback {
    /// Horizontal drawer offset, always `<= 0`
    pub offset_px: f64,
    pub overlay_opacity: f64,
}

#[derive(Debug, Clone, Copy)]
struct Swipe {
    start_x: f64,
    current_x: f64,
}

impl Swipe {
    fn delta(&self) -> f64 {
        self.current_x - self.start_x
    }
}

pub struct Drawer {
    open: bool,
    breakpoint: Breakpoint,
    surface: Arc<dyn ScrollSurface>,
    scroll_lock: Option<ScrollLock>,
    swipe: Option<Swipe>,
    swipe_close_threshold: f64,
}

impl Drawer {
    pub fn new(
        breakpoint: Breakpoint,
        surface: Arc<dyn ScrollSurface>,
        swipe_close_threshold: f64,
    ) -> Self {
        Self {
            open: false,
            breakpoint,
            surface,
            scroll_lock: None,
            swipe: None,
            swipe_close_threshold,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_some()
    }

    /// Returns `false` when the layout has no drawer (desktop).
    pub fn open(&mut self) -> bool {
        if !self.breakpoint.is_mobile_or_tablet() {
            return false;
        }
        self.open = true;
        self.sync_scroll_lock();
        true
    }

    pub fn close(&mut self) {
        self.close_with(CloseReason::Explicit);
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn on_route_change(&mut self) {
        self.close_with(CloseReason::RouteChange);
    }

    pub fn on_breakpoint_change(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
        if breakpoint.is_desktop() {
            self.close_with(CloseReason::Desktop);
        } else {
            self.sync_scroll_lock();
        }
    }

    /// Keyboard input while the drawer has focus. Returns `true` if handled.
    pub fn on_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open {
            self.close_with(CloseReason::Escape);
            return true;
        }
        false
    }

    pub fn on_overlay_click(&mut self) {
        self.close_with(CloseReason::Overlay);
    }

    pub fn touch_start(&mut self, x: f64) {
        if self.open {
            self.swipe = Some(Swipe {
                start_x: x,
                current_x: x,
            });
        }
    }

    /// Track a drag. Only leftward movement produces feedback.
    pub fn touch_move(&mut self, x: f64) -> Option<SwipeFeedback> {
        let swipe = self.swipe.as_mut()?;
        swipe.current_x = x;

        let delta = swipe.delta();
        if delta >= 0.0 {
            return None;
        }

        let progress = (delta.abs() / SWIPE_FADE_DISTANCE_PX).clamp(0.0, 1.0);
        Some(SwipeFeedback {
            offset_px: delta,
            overlay_opacity: 1.0 - progress * 0.5,
        })
    }

    /// Finish a drag. Returns `true` if it closed the drawer.
    pub fn touch_end(&mut self) -> bool {
        let Some(swipe) = self.swipe.take() else {
            return false;
        };

        if swipe.delta() < -self.swipe_close_threshold {
            self.close_with(CloseReason::Swipe);
            return true;
        }
        false
    }

    fn close_with(&mut self, reason: CloseReason) {
        self.swipe = None;
        if self.open {
            tracing::debug!("Drawer closed: {:?}", reason);
            self.open = false;
        }
        self.sync_scroll_lock();
    }

    fn sync_scroll_lock(&mut self) {
        let want_lock = self.open && self.breakpoint.is_mobile();
        match (want_lock, self.scroll_lock.is_some()) {
            (true, false) => self.scroll_lock = Some(ScrollLock::acquire(self.surface.clone())),
            (false, true) => self.scroll_lock = None,
            _ => {}
        }
    }
}

impl std::fmt::Debug for Drawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawer")
            .field("open", &self.open)
            .field("breakpoint", &self.breakpoint)
            .field("scroll_lock", &self.scroll_lock)
            .finish_non_exhaustive()
    }
}
