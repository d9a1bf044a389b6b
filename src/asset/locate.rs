//! Search-path lookup: logical path → file on disk.
//!
//! Each search path is tried in order, first hit wins:
//!
//! 1. exact match: `root/logical`
//! 2. fallback: a sibling whose name is the logical file name followed by
//!    one or more `.ext` segments (`app.js` → `app.js.tmpl.coffee`)
//!
//! When several siblings match, the lexicographically smallest name wins.

use crate::error::{AssetError, AssetResult};
use crate::fs::{FileMeta, FileSystem};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A logical path resolved to a concrete file.
#[derive(Debug, Clone)]
pub struct Located {
    /// Absolute path of the backing file.
    pub path: PathBuf,
    /// Search path the file was found under.
    pub root: PathBuf,
    pub meta: FileMeta,
}

/// Ordered search paths over a filesystem capability.
#[derive(Clone)]
pub struct Locator {
    fs: Arc<dyn FileSystem>,
    paths: Vec<PathBuf>,
}

impl Locator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            paths: Vec::new(),
        }
    }

    /// Append an already-normalized absolute directory.
    pub fn push(&mut self, dir: PathBuf) {
        self.paths.push(dir);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Find the file backing `logical`.
    pub fn locate(&self, logical: &str) -> AssetResult<Located> {
        if self.paths.is_empty() {
            return Err(AssetError::NoSearchPathConfigured);
        }

        let relative = logical.trim_start_matches('/');
        if output_extension(relative).is_none() {
            return Err(AssetError::MissingExtension(logical.to_string()));
        }

        for root in &self.paths {
            let exact = root.join(relative);
            match self.fs.stat(&exact) {
                Ok(meta) if !meta.is_dir => {
                    return Ok(Located {
                        path: exact,
                        root: root.clone(),
                        meta,
                    });
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(AssetError::Io(exact, e)),
            }

            if let Some(found) = self.search_directory(root, relative)? {
                return Ok(found);
            }
        }

        Err(AssetError::AssetNotFound {
            path: logical.to_string(),
            searched: self.paths.clone(),
        })
    }

    /// Scan the immediate children of the logical path's directory for a
    /// name carrying extra extensions.
    fn search_directory(&self, root: &Path, relative: &str) -> AssetResult<Option<Located>> {
        let (dir, file) = match relative.rfind('/') {
            Some(idx) => (root.join(&relative[..idx]), &relative[idx + 1..]),
            None => (root.to_path_buf(), relative),
        };

        let entries = match self.fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AssetError::Io(dir, e)),
        };

        let found = entries
            .into_iter()
            .filter(|meta| !meta.is_dir && has_extra_extensions(&meta.name, file))
            .min_by(|a, b| a.name.cmp(&b.name));

        Ok(found.map(|meta| Located {
            path: dir.join(&meta.name),
            root: root.to_path_buf(),
            meta,
        }))
    }
}

/// Final extension of a logical path (`lib/app.js` → `js`).
pub fn output_extension(logical: &str) -> Option<&str> {
    let file = logical.rsplit('/').next().unwrap_or(logical);
    match file.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file.len() => Some(&file[dot + 1..]),
        _ => None,
    }
}

/// `name` is `file` followed by one or more `.segment` extensions.
fn has_extra_extensions(name: &str, file: &str) -> bool {
    let Some(rest) = name.strip_prefix(file) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix('.') else {
        return false;
    };
    rest.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    })
}
