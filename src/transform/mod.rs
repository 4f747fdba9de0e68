//! Per-document transformation: parse, size, embed, redact, serialize.
//!
//! - Dimensions: page size from `viewBox` or `width`/`height`
//! - References: `href`/`src`/`xlink:href` → data URLs
//! - Redaction: blur filter for images, block glyphs for text
//! - CSS: textual `url(...)` fallback over the final markup

pub mod css;
pub mod dimensions;
pub mod redact;
pub mod references;

pub use css::{embed_css_urls, rewrite_css_urls};
pub use dimensions::{Dimensions, extract_dimensions, parse_view_box};
pub use redact::{BLOCK_GLYPH, is_redaction_class, mask_text, redact};
pub use references::{ReferenceAttr, ReferenceStats, resolve_references};

use tracing::{debug, instrument, warn};

use crate::assets::AssetRegistry;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::ingest::RawFile;
use crate::pages::PageDocument;
use crate::svg;
use crate::util::decode_text;

/// What happened to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub name: String,
    /// The structured passes ran (the document parsed).
    pub structured: bool,
    /// References replaced by data URLs, attributes and `url()` together.
    pub embedded: usize,
    /// References whose filename matched no asset.
    pub missed: usize,
    /// Elements marked for redaction.
    pub redacted: usize,
}

/// Transform already-read document bytes into a page.
///
/// A document that does not parse keeps its original text and only gets the
/// CSS pass; it still becomes a page at the default size.
pub fn transform_document(
    name: &str,
    bytes: &[u8],
    registry: &AssetRegistry,
    config: &IngestConfig,
) -> (PageDocument, TransformReport) {
    let text = decode_text(bytes);
    let mut report = TransformReport {
        name: name.to_string(),
        ..Default::default()
    };

    let (markup, dims) = match svg::parse(&text) {
        Ok(mut dom) => {
            report.structured = true;
            let dims = extract_dimensions(&dom);
            let stats = resolve_references(&mut dom, registry);
            report.embedded += stats.embedded;
            report.missed += stats.missed;
            report.redacted = redact(&mut dom, config);
            (svg::serialize(&dom), dims)
        }
        Err(err) => {
            warn!(document = name, "structured pass skipped: {err}");
            (text.into_owned(), Dimensions::default())
        }
    };

    let (content, stats) = embed_css_urls(&markup, registry);
    report.embedded += stats.embedded;
    report.missed += stats.missed;

    debug!(
        document = name,
        structured = report.structured,
        embedded = report.embedded,
        missed = report.missed,
        redacted = report.redacted,
        "transformed document"
    );

    (
        PageDocument::new(name, content, dims.width, dims.height),
        report,
    )
}

/// Read a document and transform it.
///
/// A read failure is fatal for the whole ingestion.
#[instrument(skip_all, fields(document = %file.name()))]
pub async fn transform_file(
    file: RawFile,
    registry: &AssetRegistry,
    config: &IngestConfig,
) -> Result<(PageDocument, TransformReport)> {
    let bytes = file
        .read_bytes()
        .await
        .map_err(|source| IngestError::DocumentRead {
            name: file.name().to_string(),
            source,
        })?;
    Ok(transform_document(file.name(), &bytes, registry, config))
}
