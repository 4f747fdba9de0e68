//! Sequenced pages and the two-page spread layout.

mod layout;
mod sequence;

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::ingest::SVG_MEDIA_TYPE;

pub use layout::{
    BookLayoutConfig, Slot, SpreadResult, compute_spread, spread_for_page, total_spreads,
};
pub use sequence::{natural_cmp, sequence};

/// One transformed document, ready for display.
///
/// `content` is the final markup with every resolvable reference embedded.
/// `index` is the position in the sequenced book.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    pub id: Uuid,
    pub name: String,
    pub content: Arc<str>,
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

impl PageDocument {
    /// A page with a fresh id and placeholder index 0.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Arc<str>>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
            index: 0,
            width,
            height,
        }
    }

    /// The page as a self-contained `data:` URL.
    pub fn data_url(&self) -> String {
        format!(
            "data:{SVG_MEDIA_TYPE};base64,{}",
            STANDARD.encode(self.content.as_bytes())
        )
    }
}
