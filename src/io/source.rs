use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// A readable file handed to the pipeline by the host.
///
/// Handles are immutable and shared; reading must not consume them.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// File name including extension, in its original case.
    fn name(&self) -> &str;

    /// Path hint relative to the drop root (or the bare name for flat selections).
    fn path(&self) -> &Path;

    /// Media type declared by the host, if any.
    fn media_type(&self) -> Option<&str> {
        None
    }

    /// Reads the whole content.
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// Paginated listing of one directory.
///
/// Each call returns the next batch of children. An empty batch means the
/// listing is finished; a single call is never assumed to return everything.
#[async_trait]
pub trait DirectoryReader: Send {
    async fn next_batch(&mut self) -> io::Result<Vec<Entry>>;
}

/// A directory in a dropped tree.
pub trait DirectorySource: Send + Sync {
    fn name(&self) -> &str;

    fn path(&self) -> &Path;

    /// Starts a fresh listing.
    fn reader(&self) -> Box<dyn DirectoryReader>;
}

/// One node of a dropped tree.
#[derive(Clone)]
pub enum Entry {
    File(Arc<dyn FileSource>),
    Directory(Arc<dyn DirectorySource>),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::File(f) => f.name(),
            Entry::Directory(d) => d.name(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Entry::File(f) => f.path(),
            Entry::Directory(d) => d.path(),
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
            Entry::Directory(dir) => f.debug_tuple("Directory").field(&dir.path()).finish(),
        }
    }
}
