//! Content fingerprints for cache busting.
//!
//! A fingerprint is derived from file bytes only, so two files with the same
//! content share one. Digests are memoized per absolute path for the lifetime
//! of the cache; there is no invalidation.

use crate::fs::FileSystem;
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Hex characters kept from the blake3 digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Path → fingerprint memo (thread-safe).
#[derive(Debug, Default)]
pub struct FingerprintCache {
    digests: DashMap<PathBuf, String>,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of the file at `path`, read through `fs` on first request.
    pub fn fingerprint(&self, fs: &dyn FileSystem, path: &Path) -> io::Result<String> {
        if let Some(cached) = self.digests.get(path) {
            return Ok(cached.clone());
        }

        let digest = compute(&fs.read_file(path)?);
        self.digests.insert(path.to_path_buf(), digest.clone());
        Ok(digest)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

/// Fingerprint of raw bytes.
pub fn compute(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    let mut hex = hex::encode(hash.as_bytes());
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Splice a fingerprint into a file name: `dir/base.ext` → `dir/base-<fp>.ext`.
pub fn fingerprinted_name(logical_path: &str, fingerprint: &str) -> String {
    let (dir, file) = match logical_path.rfind('/') {
        Some(idx) => logical_path.split_at(idx + 1),
        None => ("", logical_path),
    };
    match file.rfind('.') {
        Some(dot) if dot > 0 => {
            let (base, ext) = file.split_at(dot);
            format!("{dir}{base}-{fingerprint}{ext}")
        }
        _ => format!("{dir}{file}-{fingerprint}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    #[test]
    fn test_fingerprint_depends_on_content_only() {
        let fs = MemoryFs::new();
        fs.file("/notes", "all in due time\n")
            .file("/copy", "all in due time\n")
            .file("/other", "something else\n");
        let cache = FingerprintCache::new();

        let a = cache.fingerprint(&fs, Path::new("/notes")).unwrap();
        let b = cache.fingerprint(&fs, Path::new("/copy")).unwrap();
        let c = cache.fingerprint(&fs, Path::new("/other")).unwrap();

        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, compute(b"all in due time\n"));
    }

    #[test]
    fn test_fingerprint_is_memoized() {
        let fs = MemoryFs::new();
        fs.file("/app.js", "v1");
        let cache = FingerprintCache::new();

        let first = cache.fingerprint(&fs, Path::new("/app.js")).unwrap();
        fs.file("/app.js", "v2");
        let second = cache.fingerprint(&fs, Path::new("/app.js")).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_propagates() {
        let cache = FingerprintCache::new();
        let err = cache
            .fingerprint(&MemoryFs::new(), Path::new("/missing"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fingerprinted_name() {
        assert_eq!(fingerprinted_name("logo.png", "abc"), "logo-abc.png");
        assert_eq!(fingerprinted_name("img/logo.png", "abc"), "img/logo-abc.png");
        assert_eq!(fingerprinted_name("lib/jquery.min.js", "abc"), "lib/jquery.min-abc.js");
        assert_eq!(fingerprinted_name("LICENSE", "abc"), "LICENSE-abc");
    }
}
