//! Viewport breakpoints.
//!
//! Resize events are debounced before the breakpoint is recomputed, so a
//! window drag produces one update once it settles.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use skydash_core::{Debouncer, UiConfig};

pub const TABLET_MIN_WIDTH: u32 = 768;
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: u32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Self::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        *self == Self::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        *self == Self::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        *self == Self::Desktop
    }

    pub fn is_mobile_or_tablet(&self) -> bool {
        !self.is_desktop()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

/// What a layout binds to: the breakpoint plus the size it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub breakpoint: Breakpoint,
    pub window_size: WindowSize,
}

impl From<WindowSize> for Viewport {
    fn from(window_size: WindowSize) -> Self {
        Self {
            breakpoint: Breakpoint::from_width(window_size.width),
            window_size,
        }
    }
}

/// Debounced resize listener.
pub struct BreakpointWatcher {
    debouncer: Debouncer,
    viewport_tx: Arc<watch::Sender<Viewport>>,
}

impl BreakpointWatcher {
    /// The initial size is applied immediately, without debounce.
    pub fn new(initial: WindowSize, debounce: Duration) -> Self {
        let (viewport_tx, _) = watch::channel(Viewport::from(initial));
        Self {
            debouncer: Debouncer::new(debounce),
            viewport_tx: Arc::new(viewport_tx),
        }
    }

    pub fn from_config(initial: WindowSize, config: &UiConfig) -> Self {
        Self::new(initial, config.resize_debounce())
    }

    /// Report a raw resize event. Only the last size in a burst is applied.
    pub fn resize(&mut self, size: WindowSize) {
        let viewport_tx = self.viewport_tx.clone();
        self.debouncer.schedule(async move {
            let viewport = Viewport::from(size);
            viewport_tx.send_if_modified(|current| {
                if *current == viewport {
                    return false;
                }
                if current.breakpoint != viewport.breakpoint {
                    tracing::debug!(
                        "Breakpoint changed: {:?} -> {:?}",
                        current.breakpoint,
                        viewport.breakpoint
                    );
                }
                *current = viewport;
                true
            });
        });
    }

    pub fn current(&self) -> Viewport {
        *self.viewport_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Viewport> {
        self.viewport_tx.subscribe()
    }
}

impl std::fmt::Debug for BreakpointWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakpointWatcher")
            .field("viewport", &self.current())
            .field("debouncer", &self.debouncer)
            .finish()
    }
}
