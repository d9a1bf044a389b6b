//! Path utilities.
//!
//! Pure lexical functions: nothing here touches the filesystem, so they work
//! the same against disk and in-memory roots.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute (relative to the current directory) and resolve
/// `.` / `..` components lexically.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(clean(&absolute))
}

/// Resolve `.` and `..` without consulting the filesystem.
///
/// `..` never climbs above the root.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonical spelling of a logical asset path.
///
/// Drops the leading `/` and `.` segments; `..` is resolved lexically and
/// never climbs above the search root. `/b.js`, `./b.js` and `lib/../b.js`
/// all become `b.js`.
pub fn clean_logical(logical: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in logical.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
