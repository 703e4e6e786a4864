//! Navigation coordinator.
//!
//! Keeps the tracked sheet index consistent across the two ways a reader
//! moves through the deck: explicit navigation (pager clicks, which hide
//! and show sheets on large layouts and smooth-scroll on small ones) and
//! free scrolling (a throttled scroll handler that finds the sheet under
//! the viewport's vertical centre).
//!
//! A programmatic navigation arms a short guard. Scroll samples that land
//! while the guard is armed are dropped, so a still-settling smooth scroll
//! cannot overwrite the index that was just set.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::NavigationConfig;
use crate::device::DeviceClass;

/// Vertical extent of a sheet in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetRect {
    /// Distance from the document top.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

impl SheetRect {
    fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.top + self.height
    }
}

/// The host's rendered sheets.
pub trait ScrollSurface {
    /// Shows or hides one sheet.
    fn set_hidden(&mut self, index: usize, hidden: bool);

    /// Smooth-scrolls a sheet to the top of the viewport.
    fn scroll_into_view(&mut self, index: usize);

    /// Sheet extents in document order.
    fn sheet_rects(&self) -> Vec<SheetRect>;

    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Viewport height.
    fn viewport_height(&self) -> f64;
}

/// Tracked position plus the navigating guard and scroll throttle.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: usize,
    card_count: usize,
    class: DeviceClass,
    guard: Duration,
    throttle: Duration,
    guard_until: Option<Instant>,
    pending_sample: Option<Instant>,
}

impl Navigator {
    /// Creates a navigator positioned on sheet 0.
    #[must_use]
    pub const fn new(card_count: usize, class: DeviceClass, config: &NavigationConfig) -> Self {
        Self {
            current: 0,
            card_count,
            class,
            guard: config.guard,
            throttle: config.scroll_throttle,
            guard_until: None,
            pending_sample: None,
        }
    }

    /// Tracked sheet index.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Layout the navigator is operating in.
    #[must_use]
    pub const fn device_class(&self) -> DeviceClass {
        self.class
    }

    /// Resets to sheet 0 after a data load or layout rebuild.
    pub fn reset(&mut self, card_count: usize, class: DeviceClass) {
        self.current = 0;
        self.card_count = card_count;
        self.class = class;
        self.guard_until = None;
        self.pending_sample = None;
    }

    /// Whether a programmatic navigation is still settling at `now`.
    #[must_use]
    pub fn is_navigating(&self, now: Instant) -> bool {
        self.guard_until.is_some_and(|until| now < until)
    }

    /// Moves to sheet `index`.
    ///
    /// Indices outside `[0, 2N)` are ignored and return `false`. Large
    /// layouts hide every sheet except the target; small layouts scroll
    /// the target into view. Arms the navigating guard.
    pub fn navigate_to_card(
        &mut self,
        index: usize,
        surface: &mut impl ScrollSurface,
        now: Instant,
    ) -> bool {
        if index >= self.card_count.saturating_mul(2) {
            tracing::debug!(index, cards = self.card_count, "navigation index out of range");
            return false;
        }

        self.guard_until = Some(now + self.guard);
        self.current = index;

        let sheet_count = surface.sheet_rects().len();
        if !self.class.is_small() {
            for sheet in 0..sheet_count {
                surface.set_hidden(sheet, sheet != index);
            }
        } else if index < sheet_count {
            surface.scroll_into_view(index);
        } else {
            tracing::debug!(index, sheet_count, "target sheet not rendered");
        }
        tracing::debug!(index, class = %self.class, "navigated");
        true
    }

    /// Records a scroll event.
    ///
    /// Returns the instant at which [`flush_scroll`](Self::flush_scroll)
    /// should run when this event opened a new throttle window, or `None`
    /// if a sample is already pending.
    pub fn on_scroll(&mut self, now: Instant) -> Option<Instant> {
        if self.pending_sample.is_some() {
            return None;
        }
        let due = now + self.throttle;
        self.pending_sample = Some(due);
        Some(due)
    }

    /// Takes the pending scroll sample if its throttle window has elapsed.
    ///
    /// Finds the first sheet whose extent contains the viewport's vertical
    /// centre and tracks it. Samples taken while the guard is armed are
    /// dropped. Returns the new index when it changed.
    pub fn flush_scroll(&mut self, surface: &impl ScrollSurface, now: Instant) -> Option<usize> {
        let due = self.pending_sample?;
        if now < due {
            return None;
        }
        self.pending_sample = None;

        if self.is_navigating(now) {
            tracing::trace!("scroll sample dropped while navigating");
            return None;
        }

        let centre = surface.scroll_offset() + surface.viewport_height() / 2.0;
        let found = surface
            .sheet_rects()
            .iter()
            .position(|rect| rect.contains(centre))?;
        if found == self.current {
            return None;
        }
        self.current = found;
        Some(found)
    }
}
