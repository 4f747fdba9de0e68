use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::source::{DirectoryReader, DirectorySource, Entry, FileSource};

// --- Implementation: Local Filesystem ---

/// A file on the local filesystem.
pub struct FsFile {
    name: String,
    path: PathBuf,
}

impl FsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

#[async_trait]
impl FileSource for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// A directory on the local filesystem, listed `batch_size` entries at a time.
pub struct FsDirectory {
    name: String,
    path: PathBuf,
    batch_size: usize,
}

impl FsDirectory {
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            batch_size: batch_size.max(1),
        }
    }
}

impl DirectorySource for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> Box<dyn DirectoryReader> {
        Box::new(FsReader {
            path: self.path.clone(),
            batch_size: self.batch_size,
            inner: None,
            done: false,
        })
    }
}

struct FsReader {
    path: PathBuf,
    batch_size: usize,
    inner: Option<tokio::fs::ReadDir>,
    done: bool,
}

#[async_trait]
impl DirectoryReader for FsReader {
    async fn next_batch(&mut self) -> io::Result<Vec<Entry>> {
        if self.done {
            return Ok(Vec::new());
        }
        if self.inner.is_none() {
            self.inner = Some(tokio::fs::read_dir(&self.path).await?);
        }
        let Some(read_dir) = self.inner.as_mut() else {
            return Ok(Vec::new());
        };

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(dirent) = read_dir.next_entry().await? else {
                self.done = true;
                break;
            };
            let path = dirent.path();
            let entry = if dirent.file_type().await?.is_dir() {
                Entry::Directory(Arc::new(FsDirectory::new(path, self.batch_size)))
            } else {
                Entry::File(Arc::new(FsFile::new(path)))
            };
            batch.push(entry);
        }
        Ok(batch)
    }
}

/// Turns a filesystem path into a drop entry.
pub async fn entry_for_path(path: impl AsRef<Path>, batch_size: usize) -> io::Result<Entry> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path).await?;
    Ok(if metadata.is_dir() {
        Entry::Directory(Arc::new(FsDirectory::new(path, batch_size)))
    } else {
        Entry::File(Arc::new(FsFile::new(path)))
    })
}
