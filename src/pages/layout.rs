//! Two-page spread layout.
//!
//! Stateless and synchronous: the caller passes the pages, a spread index and
//! the layout flags on every call.

use super::PageDocument;

/// Layout flags chosen by the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookLayoutConfig {
    /// Page 0 is shown alone as the cover.
    pub has_cover: bool,
    /// Insert a blank slot so page parity flips.
    pub use_spacer: bool,
}

impl BookLayoutConfig {
    pub fn new(has_cover: bool, use_spacer: bool) -> Self {
        Self {
            has_cover,
            use_spacer,
        }
    }
}

/// One half of a spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Page(&'a PageDocument),
    /// Deliberate blank that shifts parity.
    Spacer,
    /// Nothing to show: the position is past either end of the book.
    Empty,
}

impl<'a> Slot<'a> {
    pub fn page(&self) -> Option<&'a PageDocument> {
        match *self {
            Slot::Page(page) => Some(page),
            Slot::Spacer | Slot::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadResult<'a> {
    pub left: Slot<'a>,
    pub right: Slot<'a>,
    pub is_cover_view: bool,
}

impl<'a> SpreadResult<'a> {
    /// Real pages in the spread, left first.
    pub fn pages(&self) -> impl Iterator<Item = &'a PageDocument> + use<'a> {
        [self.left.page(), self.right.page()].into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.pages().next().is_none()
    }
}

fn slot_at(pages: &[PageDocument], position: Option<usize>) -> Slot<'_> {
    match position.and_then(|p| pages.get(p)) {
        Some(page) => Slot::Page(page),
        None => Slot::Empty,
    }
}

/// Lay out spread `spread_index`.
pub fn compute_spread(
    pages: &[PageDocument],
    spread_index: usize,
    config: BookLayoutConfig,
) -> SpreadResult<'_> {
    if config.has_cover && spread_index == 0 {
        return SpreadResult {
            left: Slot::Empty,
            right: slot_at(pages, Some(0)),
            is_cover_view: true,
        };
    }

    let (left, right) = match (config.has_cover, config.use_spacer) {
        (true, true) => {
            let right = (spread_index - 1).checked_mul(2).and_then(|p| p.checked_add(1));
            let left = match right.map(|r| r - 1) {
                Some(0) => Slot::Spacer,
                other => slot_at(pages, other),
            };
            (left, slot_at(pages, right))
        }
        (true, false) => {
            let left = (spread_index - 1).checked_mul(2).and_then(|p| p.checked_add(1));
            (
                slot_at(pages, left),
                slot_at(pages, left.and_then(|l| l.checked_add(1))),
            )
        }
        (false, true) => {
            let right = spread_index.checked_mul(2);
            let left = match right {
                Some(0) => Slot::Spacer,
                other => slot_at(pages, other.map(|r| r - 1)),
            };
            (left, slot_at(pages, right))
        }
        (false, false) => {
            let left = spread_index.checked_mul(2);
            (
                slot_at(pages, left),
                slot_at(pages, left.and_then(|l| l.checked_add(1))),
            )
        }
    };

    SpreadResult {
        left,
        right,
        is_cover_view: false,
    }
}

/// Number of spreads that show at least one page.
pub fn total_spreads(page_count: usize, config: BookLayoutConfig) -> usize {
    let n = page_count;
    match (config.has_cover, config.use_spacer) {
        (_, _) if n == 0 => 0,
        (true, true) if n == 1 => 1,
        (true, true) => (n + 1) / 2 + 1,
        (true, false) | (false, true) => n / 2 + 1,
        (false, false) => n.div_ceil(2),
    }
}

/// The spread that shows page `page_index`, or `None` if there is no such page.
pub fn spread_for_page(
    page_index: usize,
    page_count: usize,
    config: BookLayoutConfig,
) -> Option<usize> {
    if page_index >= page_count {
        return None;
    }
    let p = page_index;
    Some(match (config.has_cover, config.use_spacer) {
        (true, _) if p == 0 => 0,
        (true, true) => p / 2 + 1,
        (true, false) | (false, true) => (p + 1) / 2,
        (false, false) => p / 2,
    })
}
