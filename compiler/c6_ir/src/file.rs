//! Shared table of source files.
//!
//! Every file the compiler reads is registered once and referred to by a
//! [`FileIndex`] afterwards. The table is append-only and shared between
//! worker threads; readers receive a copy of the entry taken under the lock.

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Index of a file in a [`FileTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct FileIndex(u32);

impl FileIndex {
    /// Create a `FileIndex` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        FileIndex(index)
    }

    /// Get the index into the table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileIndex({})", self.0)
    }
}

/// One registered source file.
///
/// Cloning is cheap: the content is reference counted.
#[derive(Clone, Debug)]
pub struct FileEntry {
    pub index: FileIndex,
    /// Path as given on the command line or in a `#load` directive.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub content: Arc<str>,
}

/// Append-only registry of source files.
#[derive(Default)]
pub struct FileTable {
    entries: Mutex<Vec<FileEntry>>,
}

impl FileTable {
    pub fn new() -> Self {
        FileTable::default()
    }

    /// Register a file and return its index.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` files are registered.
    pub fn add(
        &self,
        relative_path: impl Into<String>,
        absolute_path: impl AsRef<Path>,
        content: impl Into<Arc<str>>,
    ) -> FileIndex {
        let mut entries = self.entries.lock();
        let index = FileIndex(
            u32::try_from(entries.len())
                .unwrap_or_else(|_| panic!("file table exceeded u32::MAX entries")),
        );
        entries.push(FileEntry {
            index,
            relative_path: relative_path.into(),
            absolute_path: absolute_path.as_ref().to_path_buf(),
            content: content.into(),
        });
        index
    }

    /// Copy out the entry for `index`.
    pub fn get(&self, index: FileIndex) -> Option<FileEntry> {
        self.entries.lock().get(index.index()).cloned()
    }

    /// Find an already registered file by absolute path.
    pub fn find(&self, absolute_path: &Path) -> Option<FileIndex> {
        self.entries
            .lock()
            .iter()
            .find(|entry| entry.absolute_path == absolute_path)
            .map(|entry| entry.index)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl fmt::Debug for FileTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTable")
            .field("len", &self.len())
            .finish()
    }
}

/// Thread-safe handle to a [`FileTable`], passed into each compilation job.
#[derive(Clone, Debug, Default)]
pub struct SharedFiles(Arc<FileTable>);

impl SharedFiles {
    pub fn new() -> Self {
        SharedFiles(Arc::new(FileTable::new()))
    }
}

impl Deref for SharedFiles {
    type Target = FileTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
