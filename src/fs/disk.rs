//! Local disk implementation.

use super::{FileMeta, FileSystem, file_name};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

fn meta_of(name: String, meta: &fs::Metadata) -> FileMeta {
    FileMeta {
        name,
        size: meta.len(),
        modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        is_dir: meta.is_dir(),
    }
}

impl FileSystem for DiskFs {
    fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        let meta = fs::metadata(path)?;
        Ok(meta_of(file_name(path), &meta))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileMeta>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let Ok(entry) = entry else { continue };
            // Follow symlinks so linked files count as files; a dangling
            // link falls back to its own metadata
            let Ok(meta) = fs::metadata(entry.path()).or_else(|_| entry.metadata()) else {
                continue;
            };
            entries.push(meta_of(entry.file_name().to_string_lossy().into_owned(), &meta));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stat_and_read() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "console.log(1)").unwrap();

        let meta = DiskFs.stat(&file).unwrap();
        assert_eq!(meta.name, "app.js");
        assert_eq!(meta.size, 14);
        assert!(!meta.is_dir);
        assert_eq!(DiskFs.read_file(&file).unwrap(), b"console.log(1)");
    }

    #[test]
    fn test_read_dir_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();

        let names: Vec<_> = DiskFs
            .read_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|m| (m.name, m.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.js".to_string(), false),
                ("b.js".to_string(), false),
                ("lib".to_string(), true),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_dir_tolerates_dangling_symlink() {
        use crate::asset::Locator;
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js.a"), "app").unwrap();
        std::os::unix::fs::symlink("missing-target", dir.path().join("zz-broken")).unwrap();

        let names: Vec<_> = DiskFs
            .read_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["app.js.a", "zz-broken"]);

        let mut locator = Locator::new(Arc::new(DiskFs));
        locator.push(dir.path().to_path_buf());
        let found = locator.locate("app.js").unwrap();
        assert_eq!(found.path, dir.path().join("app.js.a"));
    }

    #[test]
    fn test_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = DiskFs.stat(&dir.path().join("missing.js")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
