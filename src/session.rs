//! Reader state: the published book plus where the reader is in it.

use tracing::{debug, info, instrument};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::ingest::Transfer;
use crate::pages::{BookLayoutConfig, SpreadResult, compute_spread, spread_for_page, total_spreads};
use crate::pipeline::{Book, ingest};

/// Holds at most one published book at a time.
///
/// A load either replaces the book entirely or leaves the session exactly as
/// it was, so a reader never sees a half-ingested page set.
#[derive(Debug, Default)]
pub struct Session {
    config: IngestConfig,
    book: Option<Book>,
    layout: BookLayoutConfig,
    spread: usize,
}

impl Session {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: BookLayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Ingest a transfer and publish it, starting at the first spread.
    #[instrument(skip_all)]
    pub async fn load(&mut self, transfer: Transfer) -> Result<&Book> {
        let book = ingest(transfer, &self.config).await?;
        info!(pages = book.len(), "published book");
        self.spread = 0;
        Ok(self.book.insert(book))
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn layout(&self) -> BookLayoutConfig {
        self.layout
    }

    pub fn current_spread(&self) -> usize {
        self.spread
    }

    fn page_count(&self) -> usize {
        self.book.as_ref().map_or(0, Book::len)
    }

    pub fn total_spreads(&self) -> usize {
        total_spreads(self.page_count(), self.layout)
    }

    /// The spread currently on screen.
    pub fn spread(&self) -> SpreadResult<'_> {
        let pages = self.book.as_ref().map_or(&[][..], |b| &b.pages[..]);
        compute_spread(pages, self.spread, self.layout)
    }

    /// Jump to a spread, clamped to the book. Returns the spread now shown.
    pub fn go_to_spread(&mut self, index: usize) -> usize {
        let last = self.total_spreads().saturating_sub(1);
        self.spread = index.min(last);
        self.spread
    }

    pub fn next(&mut self) -> usize {
        self.go_to_spread(self.spread.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.go_to_spread(self.spread.saturating_sub(1))
    }

    /// Change the layout while keeping the first visible page in view.
    pub fn set_config(&mut self, layout: BookLayoutConfig) {
        let anchor = self.spread().pages().next().map(|p| p.index);
        self.layout = layout;
        let target = anchor
            .and_then(|p| spread_for_page(p, self.page_count(), layout))
            .unwrap_or(0);
        debug!(?anchor, target, "layout changed");
        self.go_to_spread(target);
    }
}
