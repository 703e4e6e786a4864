//! Page index state machine and compressed page-number window.
//!
//! States are page indices in `[0, total)`, starting at 0. The rendered
//! window always shows the first and last page, up to [`WINDOW_DELTA`]
//! pages either side of the current one, and collapses each gap into a
//! single ellipsis.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Pages shown on each side of the current page.
pub const WINDOW_DELTA: usize = 2;

/// Pager transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "action", content = "page")]
pub enum PagerAction {
    /// Jump to the first page.
    First,
    /// Step back one page.
    Prev,
    /// Step forward one page.
    Next,
    /// Jump to the last page.
    Last,
    /// Jump to an explicit page index.
    Select(usize),
}

/// Boundary control of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `«`
    First,
    /// `‹`
    Prev,
    /// `›`
    Next,
    /// `»`
    Last,
}

/// One entry of the page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum PageItem {
    /// A selectable page, 0-based `index`.
    Page {
        /// Page index.
        index: usize,
        /// Whether this is the current page.
        active: bool,
    },
    /// A collapsed run of pages.
    Ellipsis,
}

/// Page index tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pager {
    current: usize,
    total: usize,
}

impl Pager {
    /// A pager over `total` pages, positioned on the first.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Current page index.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Number of pages.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    const fn last_index(&self) -> usize {
        self.total.saturating_sub(1)
    }

    /// Changes the page count, clamping the current index into range.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current = self.current.min(self.last_index());
    }

    /// Applies a transition. Returns `true` if the current page changed.
    ///
    /// `Select` with an index outside `[0, total)` is ignored.
    pub fn apply(&mut self, action: PagerAction) -> bool {
        let target = match action {
            PagerAction::First => 0,
            PagerAction::Prev => self.current.saturating_sub(1),
            PagerAction::Next => (self.current + 1).min(self.last_index()),
            PagerAction::Last => self.last_index(),
            PagerAction::Select(index) if index < self.total => index,
            PagerAction::Select(index) => {
                tracing::debug!(index, total = self.total, "page selection out of range");
                return false;
            }
        };
        let changed = target != self.current;
        self.current = target;
        changed
    }

    /// Page index a boundary control leads to.
    #[must_use]
    pub fn target(&self, boundary: Boundary) -> usize {
        let mut probe = *self;
        probe.apply(match boundary {
            Boundary::First => PagerAction::First,
            Boundary::Prev => PagerAction::Prev,
            Boundary::Next => PagerAction::Next,
            Boundary::Last => PagerAction::Last,
        });
        probe.current
    }

    /// Whether a boundary control is disabled: exactly when the current
    /// page already sits on that boundary.
    #[must_use]
    pub const fn is_disabled(&self, boundary: Boundary) -> bool {
        match boundary {
            Boundary::First | Boundary::Prev => self.current == 0,
            Boundary::Next | Boundary::Last => self.current == self.last_index(),
        }
    }

    /// The compressed page-number window.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.current, self.total)
    }

    /// Renders the pager controls.
    ///
    /// Every control carries `data-page` with the 0-based index it leads
    /// to; page labels are 1-based.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::new();
        for (boundary, id, label) in [
            (Boundary::First, "first", "&laquo;"),
            (Boundary::Prev, "prev", "&lsaquo;"),
        ] {
            self.render_boundary(&mut html, boundary, id, label);
        }
        for item in self.window() {
            match item {
                PageItem::Page { index, active } => {
                    let class = if active { "page active" } else { "page" };
                    let _ = write!(
                        html,
                        "<button class='{class}' data-page='{index}'>{}</button>",
                        index + 1
                    );
                }
                PageItem::Ellipsis => html.push_str("<span class='ellipsis'>...</span>"),
            }
        }
        for (boundary, id, label) in [
            (Boundary::Next, "next", "&rsaquo;"),
            (Boundary::Last, "last", "&raquo;"),
        ] {
            self.render_boundary(&mut html, boundary, id, label);
        }
        html
    }

    fn render_boundary(&self, html: &mut String, boundary: Boundary, id: &str, label: &str) {
        let disabled = if self.is_disabled(boundary) {
            " disabled"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<button id='{id}' data-page='{}'{disabled}>{label}</button>",
            self.target(boundary)
        );
    }
}

/// Builds the page-number window for `current` (0-based) of `total` pages.
///
/// The window is centred on the current page as displayed (1-based), so
/// `current = 5, total = 10` yields `1 … 4 5 6 7 8 … 10` with 6 active.
#[must_use]
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.min(total - 1);
    let shown = current + 1;
    let page = |number: usize| PageItem::Page {
        index: number - 1,
        active: number == shown,
    };

    let start = shown.saturating_sub(WINDOW_DELTA).max(2);
    let end = shown.saturating_add(WINDOW_DELTA).min(total - 1);

    let mut items = vec![page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(page));
    if total > 1 {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(page(total));
    }
    items
}
