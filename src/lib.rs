//! # svgbook
//!
//! Turn a dropped folder (or a selection) of SVG pages into a book of
//! self-contained pages laid out as two-page spreads.
//!
//! ## Pipeline
//!
//! 1. Traverse the transfer, descending directories batch by batch
//! 2. Split files into SVG documents and assets
//! 3. Encode every asset as a `data:` URL ([`AssetRegistry`])
//! 4. Transform each document: page size, reference embedding, redaction,
//!    and a textual `url(...)` pass for stylesheets
//! 5. Sort pages in natural order (`page2` before `page10`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use svgbook::{BookLayoutConfig, IngestConfig, Session, Transfer};
//! use svgbook::io::entry_for_path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = entry_for_path("chapters/", 100).await?;
//! let mut session = Session::new(IngestConfig::default())
//!     .with_layout(BookLayoutConfig::new(true, true));
//! session.load(Transfer::dropped([entry])).await?;
//!
//! for page in session.spread().pages() {
//!     println!("{} ({}x{})", page.name, page.width, page.height);
//! }
//! session.next();
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout without a session
//!
//! [`compute_spread`] is a pure function of the pages, a spread index and the
//! layout flags:
//!
//! ```
//! use svgbook::{BookLayoutConfig, PageDocument, compute_spread, total_spreads};
//!
//! let pages: Vec<_> = (0..3)
//!     .map(|i| PageDocument::new(format!("{i}.svg"), "<svg/>", 595.0, 842.0))
//!     .collect();
//! let config = BookLayoutConfig::new(true, true);
//!
//! assert!(compute_spread(&pages, 0, config).is_cover_view);
//! assert_eq!(total_spreads(pages.len(), config), 3);
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod ingest;
pub mod io;
pub mod pages;
pub mod pipeline;
pub mod session;
pub mod svg;
pub mod transform;
pub mod util;

pub use assets::{AssetRegistry, LookupStrategy, extract_filename};
pub use config::IngestConfig;
pub use error::{AssetError, ConfigError, IngestError, ParseError, Result};
pub use ingest::{RawFile, Transfer};
pub use pages::{
    BookLayoutConfig, PageDocument, Slot, SpreadResult, compute_spread, spread_for_page,
    total_spreads,
};
pub use pipeline::{Book, ingest};
pub use session::Session;
pub use transform::{TransformReport, transform_document};
