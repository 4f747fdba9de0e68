use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::source::{DirectoryReader, DirectorySource, Entry, FileSource};

// --- Implementation: In-Memory ---

/// An in-memory file backed by a `Vec<u8>`.
///
/// A file built with [`MemoryFile::failing`] returns an error on every read,
/// which is how hosts surface unreadable handles.
pub struct MemoryFile {
    name: String,
    path: PathBuf,
    media_type: Option<String>,
    data: Result<Vec<u8>, io::ErrorKind>,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            media_type: None,
            data: Ok(data.into()),
        }
    }

    pub fn failing(path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            media_type: None,
            data: Err(kind),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn into_entry(self) -> Entry {
        Entry::File(self.into_raw())
    }

    /// The file as a shareable handle, as a selection would provide it.
    pub fn into_raw(self) -> Arc<dyn FileSource> {
        Arc::new(self)
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match &self.data {
            Ok(data) => Ok(data.clone()),
            Err(kind) => Err(io::Error::new(*kind, format!("cannot read {}", self.name))),
        }
    }
}

/// An in-memory directory whose listing is served in fixed-size batches.
pub struct MemoryDirectory {
    name: String,
    path: PathBuf,
    children: Vec<Entry>,
    batch_size: usize,
    fail_listing: bool,
}

impl MemoryDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            children: Vec::new(),
            batch_size: usize::MAX,
            fail_listing: false,
        }
    }

    /// Serve at most `size` entries per `next_batch` call.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Make the second batch request fail.
    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.children.push(file.into_entry());
        self
    }

    pub fn with_dir(mut self, dir: MemoryDirectory) -> Self {
        self.children.push(dir.into_entry());
        self
    }

    pub fn into_entry(self) -> Entry {
        Entry::Directory(Arc::new(self))
    }
}

impl DirectorySource for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> Box<dyn DirectoryReader> {
        Box::new(MemoryReader {
            remaining: self.children.clone(),
            batch_size: self.batch_size,
            fail_after_first: self.fail_listing,
            calls: 0,
        })
    }
}

struct MemoryReader {
    remaining: Vec<Entry>,
    batch_size: usize,
    fail_after_first: bool,
    calls: usize,
}

#[async_trait]
impl DirectoryReader for MemoryReader {
    async fn next_batch(&mut self) -> io::Result<Vec<Entry>> {
        self.calls += 1;
        if self.fail_after_first && self.calls > 1 {
            return Err(io::Error::other("listing interrupted"));
        }
        let take = self.batch_size.min(self.remaining.len());
        Ok(self.remaining.drain(..take).collect())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
