//! The deck controller.
//!
//! [`Deck`] is the single owner of everything that changes while a deck is
//! on screen: the cached device class, the sheets built for it, the pager
//! and the navigation state. Host events (resize, orientation change,
//! pager clicks, scrolling) are methods on it, and the host surface is
//! passed in per call rather than held.

use std::sync::Arc;

use tokio::time::Instant;

use crate::config::{DeckConfig, LayoutConfig, NavigationConfig};
use crate::data::Card;
use crate::device::{CapabilityProbe, DeviceClass, DeviceClassifier};
use crate::layout::{self, Sheet};
use crate::navigation::{Navigator, ScrollSurface};
use crate::pager::{Pager, PagerAction};

/// Title used for rendered documents.
pub const DEFAULT_TITLE: &str = "Name Origin Flashcards";

/// Deck state for one viewer.
#[derive(Debug)]
pub struct Deck<P> {
    cards: Arc<Vec<Card>>,
    classifier: DeviceClassifier<P>,
    layout: LayoutConfig,
    navigation: NavigationConfig,
    class: DeviceClass,
    sheets: Vec<Sheet>,
    pager: Pager,
    navigator: Navigator,
}

impl<P: CapabilityProbe> Deck<P> {
    /// Builds the deck for the probe's current viewport.
    pub fn new(cards: Arc<Vec<Card>>, probe: P, config: &DeckConfig) -> Self {
        let mut classifier = DeviceClassifier::new(probe, config.layout.small_max_width);
        let class = classifier.classify();
        let mut deck = Self {
            navigator: Navigator::new(cards.len(), class, &config.navigation),
            cards,
            classifier,
            layout: config.layout.clone(),
            navigation: config.navigation.clone(),
            class,
            sheets: Vec::new(),
            pager: Pager::default(),
        };
        deck.rebuild();
        deck
    }

    /// Loaded cards.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Layout the sheets were built for.
    #[must_use]
    pub const fn device_class(&self) -> DeviceClass {
        self.class
    }

    /// Current sheets.
    #[must_use]
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Pager state.
    #[must_use]
    pub const fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Navigation state.
    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Mutable access to the capability probe.
    pub fn probe_mut(&mut self) -> &mut P {
        self.classifier.probe_mut()
    }

    /// Re-partitions the cards for the (possibly cached) device class and
    /// resets pager and navigation to the first sheet.
    pub fn rebuild(&mut self) {
        self.class = self.classifier.classify();
        self.sheets = layout::partition(self.cards.len(), self.class, self.layout.cards_per_sheet);
        self.pager = Pager::new(self.sheets.len());
        self.navigator.reset(self.cards.len(), self.class);
        tracing::debug!(
            class = %self.class,
            sheets = self.sheets.len(),
            cards = self.cards.len(),
            "deck rebuilt"
        );
    }

    /// Viewport resized: drop the cached class and rebuild.
    pub fn on_resize(&mut self) {
        self.classifier.invalidate();
        self.rebuild();
    }

    /// Orientation changed: wait for the viewport to settle, then rebuild.
    pub async fn on_orientation_change(&mut self) {
        tokio::time::sleep(self.navigation.orientation_settle).await;
        self.classifier.invalidate();
        self.rebuild();
    }

    /// Applies a pager click and moves the surface to the selected sheet.
    ///
    /// Pager pages and sheets share one index space in both layouts, so the
    /// selected page is handed to the navigator unchanged. Returns `true`
    /// when the pager moved.
    pub fn on_pager_action(
        &mut self,
        action: PagerAction,
        surface: &mut impl ScrollSurface,
        now: Instant,
    ) -> bool {
        let changed = self.pager.apply(action);
        self.navigator
            .navigate_to_card(self.pager.current(), surface, now);
        changed
    }

    /// Moves directly to sheet `index`. Out-of-range indices are ignored.
    pub fn navigate_to_card(
        &mut self,
        index: usize,
        surface: &mut impl ScrollSurface,
        now: Instant,
    ) -> bool {
        self.navigator.navigate_to_card(index, surface, now)
    }

    /// Records a scroll event; see [`Navigator::on_scroll`].
    pub fn on_scroll(&mut self, now: Instant) -> Option<Instant> {
        self.navigator.on_scroll(now)
    }

    /// Takes a due scroll sample; see [`Navigator::flush_scroll`].
    ///
    /// The pager is left as it is.
    pub fn flush_scroll(&mut self, surface: &impl ScrollSurface, now: Instant) -> Option<usize> {
        self.navigator.flush_scroll(surface, now)
    }

    /// Selects a page without a surface, for server-side rendering.
    pub fn select_page(&mut self, page: usize) -> bool {
        self.pager.apply(PagerAction::Select(page))
    }

    /// Sheet markup with the current page visible.
    #[must_use]
    pub fn render_sheets(&self) -> String {
        layout::render_sheets(&self.cards, &self.sheets, self.class, self.pager.current())
    }

    /// Pager markup.
    #[must_use]
    pub fn render_pager(&self) -> String {
        self.pager.render()
    }

    /// Full HTML document.
    #[must_use]
    pub fn render_page(&self, title: &str) -> String {
        layout::render_document(title, self.class, &self.render_sheets(), &self.render_pager())
    }
}
