//! Host capabilities: reading file bytes and listing directories in batches.

mod fs;
mod memory;
mod source;

pub use fs::{FsDirectory, FsFile, entry_for_path};
pub use memory::{MemoryDirectory, MemoryFile};
pub use source::{DirectoryReader, DirectorySource, Entry, FileSource};
