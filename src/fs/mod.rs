//! Filesystem capability consumed by the engine.
//!
//! The engine never touches a disk directly. Everything goes through
//! [`FileSystem`], which keeps lookup deterministic under test:
//!
//! - [`DiskFs`]: real files via `std::fs`
//! - [`MemoryFs`]: in-memory tree, directories implied by file paths

mod disk;
mod memory;

pub use disk::DiskFs;
pub use memory::MemoryFs;

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// File metadata, detached from any particular filesystem implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Final path component.
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Primitive read-only operations over an abstract root.
///
/// Missing entries must be reported as [`io::ErrorKind::NotFound`].
pub trait FileSystem: Send + Sync {
    fn stat(&self, path: &Path) -> io::Result<FileMeta>;

    /// Immediate children of `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileMeta>>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// `path`'s final component as a string (empty for `/`).
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[inline]
pub(crate) fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}
