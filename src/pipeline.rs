//! End-to-end ingestion: transfer in, sequenced book out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, instrument};

use crate::assets::AssetRegistry;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::ingest::{Transfer, collect_files, partition};
use crate::pages::{PageDocument, sequence};
use crate::transform::{TransformReport, transform_file};

/// A fully ingested book.
///
/// `pages` is in reading order with `index` matching position. `reports`
/// holds one entry per page, in the same order.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub pages: Vec<PageDocument>,
    pub reports: Vec<TransformReport>,
}

impl Book {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&PageDocument> {
        self.pages.get(index)
    }

    /// The transform report for a page.
    pub fn report(&self, index: usize) -> Option<&TransformReport> {
        self.reports.get(index)
    }
}

/// Run the whole pipeline.
///
/// Either every document becomes a page or the call fails; a failed run
/// produces no partial book. Unreadable assets and unparsable documents are
/// not failures.
#[instrument(skip_all)]
pub async fn ingest(transfer: Transfer, config: &IngestConfig) -> Result<Book> {
    let files = collect_files(transfer, config).await?;
    let (documents, assets) = partition(files);
    info!(
        documents = documents.len(),
        assets = assets.len(),
        "classified files"
    );

    let registry = Arc::new(AssetRegistry::build(assets).await);
    let config = Arc::new(config.clone());

    let mut tasks = JoinSet::new();
    let mut names = HashMap::new();
    for document in documents {
        let name = document.name().to_string();
        let registry = Arc::clone(&registry);
        let config = Arc::clone(&config);
        let handle =
            tasks.spawn(async move { transform_file(document, &registry, &config).await });
        names.insert(handle.id(), name);
    }

    let mut transformed = Vec::with_capacity(names.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => transformed.push(result?),
            Err(err) => {
                let name = names.remove(&err.id()).unwrap_or_default();
                return Err(IngestError::Task {
                    name,
                    reason: err.to_string(),
                });
            }
        }
    }

    let (pages, reports) = order(transformed);

    let structured = reports.iter().filter(|r| r.structured).count();
    let embedded: usize = reports.iter().map(|r| r.embedded).sum();
    let missed: usize = reports.iter().map(|r| r.missed).sum();
    info!(
        pages = pages.len(),
        fallback = pages.len() - structured,
        embedded,
        missed,
        "book ingested"
    );

    Ok(Book { pages, reports })
}

/// Sequence pages and line reports up with them.
fn order(
    transformed: Vec<(PageDocument, TransformReport)>,
) -> (Vec<PageDocument>, Vec<TransformReport>) {
    let (pages, reports): (Vec<_>, Vec<_>) = transformed.into_iter().unzip();
    let mut by_id: HashMap<_, _> = pages.iter().map(|p| p.id).zip(reports).collect();

    let pages = sequence(pages);
    let reports = pages
        .iter()
        .map(|p| by_id.remove(&p.id).unwrap_or_default())
        .collect();
    (pages, reports)
}
