//! In-memory filesystem.

use super::{FileMeta, FileSystem, file_name, not_found};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// [`FileSystem`] holding files in memory.
///
/// Directories exist implicitly as ancestors of stored files. Timestamps are
/// pinned to the epoch so results never depend on wall-clock time.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> &Self {
        self.files.write().insert(path.into(), content.into());
        self
    }

    fn file_meta(path: &Path, size: usize) -> FileMeta {
        FileMeta {
            name: file_name(path),
            size: size as u64,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: false,
        }
    }

    fn dir_meta(name: String) -> FileMeta {
        FileMeta {
            name,
            size: 0,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: true,
        }
    }
}

impl FileSystem for MemoryFs {
    fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        let files = self.files.read();
        if let Some(content) = files.get(path) {
            return Ok(Self::file_meta(path, content.len()));
        }
        if files.keys().any(|p| p != path && p.starts_with(path)) {
            return Ok(Self::dir_meta(file_name(path)));
        }
        Err(not_found(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileMeta>> {
        let files = self.files.read();
        let mut children: BTreeMap<String, FileMeta> = BTreeMap::new();

        for (file, content) in files.iter() {
            let Ok(rest) = file.strip_prefix(path) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            let meta = if components.next().is_some() {
                Self::dir_meta(name.clone())
            } else {
                Self::file_meta(file, content.len())
            };
            children.entry(name).or_insert(meta);
        }

        if children.is_empty() {
            return Err(not_found(path));
        }
        Ok(children.into_values().collect())
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryFs {
        let fs = MemoryFs::new();
        fs.file("/assets/b.js", "b")
            .file("/assets/a.js", "aa")
            .file("/assets/lib/1", "")
            .file("/assets/lib/2", "");
        fs
    }

    #[test]
    fn test_stat_file_and_implicit_dir() {
        let fs = sample();
        let meta = fs.stat(Path::new("/assets/a.js")).unwrap();
        assert_eq!(meta.name, "a.js");
        assert_eq!(meta.size, 2);
        assert!(!meta.is_dir);

        assert!(fs.stat(Path::new("/assets/lib")).unwrap().is_dir);
        assert_eq!(
            fs.stat(Path::new("/assets/nope.js")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_read_dir_lists_immediate_children_sorted() {
        let fs = sample();
        let entries = fs.read_dir(Path::new("/assets")).unwrap();
        let names: Vec<_> = entries.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "b.js", "lib"]);
        assert!(entries[2].is_dir);
    }

    #[test]
    fn test_read_dir_does_not_match_name_prefix() {
        let fs = sample();
        // `/assets/li` is a string prefix of `/assets/lib/1` but not a path prefix
        assert!(fs.read_dir(Path::new("/assets/li")).is_err());
    }

    #[test]
    fn test_read_file() {
        let fs = sample();
        assert_eq!(fs.read_file(Path::new("/assets/b.js")).unwrap(), b"b");
        assert!(fs.read_file(Path::new("/assets/lib")).is_err());
    }
}
