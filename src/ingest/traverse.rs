//! Flattening of dropped trees and file selections.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::io::{DirectorySource, Entry, FileSource};

/// A file handle produced by traversal.
pub type RawFile = Arc<dyn FileSource>;

/// What the host handed over.
#[derive(Clone)]
pub enum Transfer {
    /// A drag-and-drop payload: loose files mixed with directory trees.
    Dropped(Vec<Entry>),
    /// A flat multi-file selection.
    Selected(Vec<RawFile>),
}

impl Transfer {
    pub fn dropped(entries: impl IntoIterator<Item = Entry>) -> Self {
        Transfer::Dropped(entries.into_iter().collect())
    }

    pub fn selected(files: impl IntoIterator<Item = RawFile>) -> Self {
        Transfer::Selected(files.into_iter().collect())
    }
}

/// Flatten a transfer into raw file handles, dropping hidden names.
///
/// Directories are descended depth-first in listing order. Any listing
/// failure aborts the whole traversal.
#[instrument(skip_all)]
pub async fn collect_files(transfer: Transfer, config: &IngestConfig) -> Result<Vec<RawFile>> {
    let files = match transfer {
        Transfer::Selected(files) => files,
        Transfer::Dropped(entries) => walk(entries).await?,
    };

    let total = files.len();
    let visible: Vec<RawFile> = files
        .into_iter()
        .filter(|f| !config.is_hidden(f.name()))
        .collect();

    debug!(total, hidden = total - visible.len(), "traversal complete");
    Ok(visible)
}

async fn walk(entries: Vec<Entry>) -> Result<Vec<RawFile>> {
    let mut files = Vec::new();
    // Reversed so that popping yields entries in the order received.
    let mut stack: Vec<Entry> = entries.into_iter().rev().collect();

    while let Some(entry) = stack.pop() {
        match entry {
            Entry::File(file) => files.push(file),
            Entry::Directory(dir) => {
                let children = list_all(dir.as_ref()).await?;
                stack.extend(children.into_iter().rev());
            }
        }
    }

    Ok(files)
}

/// Drain a directory listing batch by batch until an empty batch arrives.
async fn list_all(dir: &dyn DirectorySource) -> Result<Vec<Entry>> {
    let mut reader = dir.reader();
    let mut children = Vec::new();
    let mut batches = 0usize;

    loop {
        let batch = reader
            .next_batch()
            .await
            .map_err(|source| IngestError::Listing {
                path: dir.path().to_path_buf(),
                source,
            })?;
        if batch.is_empty() {
            break;
        }
        batches += 1;
        children.extend(batch);
    }

    debug!(path = %dir.path().display(), batches, entries = children.len(), "listed directory");
    Ok(children)
}
