//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to returning the path as-is if absolute, otherwise
/// joining it with the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a configured path against the project root.
pub fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// Root-relative path with `/` separators, used for reports and exclude matching.
pub fn display_relative(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for (i, component) in rel.components().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        assert!(normalize_path(path).is_absolute());
    }

    #[test]
    fn test_resolve_under_relative() {
        let resolved = resolve_under(Path::new("/site"), Path::new("dist"));
        assert_eq!(resolved, PathBuf::from("/site/dist"));
    }

    #[test]
    fn test_resolve_under_absolute() {
        let resolved = resolve_under(Path::new("/site"), Path::new("/tmp/out"));
        assert_eq!(resolved, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_display_relative() {
        let rel = display_relative(Path::new("/site/dist/areas/index.html"), Path::new("/site"));
        assert_eq!(rel, "dist/areas/index.html");
        assert_eq!(display_relative(Path::new("other/x.js"), Path::new("/site")), "other/x.js");
    }
}
