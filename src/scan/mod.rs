//! Static output scanner.
//!
//! Walks a directory tree depth-first in name order and yields text files
//! line by line. Nothing is read until the iterator is driven, and every
//! call to [`Scanner::files`] starts a fresh walk.
//!
//! Exclude patterns match the root-relative, `/`-separated path. An excluded
//! directory is pruned, so nothing below it is visited.

use jwalk::WalkDir;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::utils::path::display_relative;

/// A file that could not be scanned. Logged and counted, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for IoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// A readable UTF-8 text file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Root-relative display path.
    pub rel: String,
    pub text: String,
}

/// One line of a scanned file (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub file: &'a str,
    pub number: usize,
    pub text: &'a str,
}

impl SourceFile {
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.text.lines().enumerate().map(|(idx, text)| Line {
            file: &self.rel,
            number: idx + 1,
            text,
        })
    }
}

/// Lazy directory scanner.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    extensions: Arc<Vec<String>>,
    excludes: Arc<Vec<Regex>>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String], excludes: Vec<Regex>) -> Self {
        Self {
            root: root.into(),
            extensions: Arc::new(
                extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                    .collect(),
            ),
            excludes: Arc::new(excludes),
        }
    }

    /// Walk the tree, yielding candidate files or walk errors.
    pub fn entries(&self) -> impl Iterator<Item = Result<PathBuf, IoWarning>> + use<> {
        let root = self.root.clone();
        let prune_root = root.clone();
        let excludes = Arc::clone(&self.excludes);
        let extensions = Arc::clone(&self.extensions);

        WalkDir::new(&root)
            .sort(true)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| match entry {
                    Ok(entry) => {
                        let rel = display_relative(&entry.parent_path.join(&entry.file_name), &prune_root);
                        !excludes.iter().any(|re| re.is_match(&rel))
                    }
                    Err(_) => true,
                });
            })
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let path = entry.path();
                    has_extension(&path, &extensions).then_some(Ok(path))
                }
                Ok(_) => None,
                Err(err) => Some(Err(IoWarning {
                    path: err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
                    reason: err.to_string(),
                })),
            })
    }

    /// Candidate files, in depth-first name order.
    #[allow(dead_code)]
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + use<> {
        self.entries().filter_map(Result::ok)
    }

    /// Read every candidate file.
    #[allow(dead_code)]
    pub fn scan(&self) -> impl Iterator<Item = Result<SourceFile, IoWarning>> + use<'_> {
        self.entries().map(|entry| entry.and_then(|path| self.read(&path)))
    }

    /// Read one file as UTF-8 text.
    pub fn read(&self, path: &Path) -> Result<SourceFile, IoWarning> {
        let warn = |reason: String| IoWarning {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| warn(e.to_string()))?;
        if bytes.contains(&0) {
            return Err(warn("binary content (NUL byte)".into()));
        }
        let text = String::from_utf8(bytes).map_err(|_| warn("not valid UTF-8".into()))?;
        Ok(SourceFile {
            rel: display_relative(path, &self.root),
            text,
        })
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".well-known")).unwrap();
        fs::write(root.join("z.html"), "<p>z</p>").unwrap();
        fs::write(root.join("a.HTML"), "line one\nline two\n").unwrap();
        fs::write(root.join("b/nested/c.js"), "c").unwrap();
        fs::write(root.join("b/d.js.map"), "{}").unwrap();
        fs::write(root.join("b/e.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join(".well-known/security.txt"), "contact").unwrap();
        temp
    }

    fn scanner(root: &Path) -> Scanner {
        Scanner::new(
            root,
            &strings(&["html", "js", "txt", "map"]),
            vec![
                Regex::new(r"(^|/)node_modules(/|$)").unwrap(),
                Regex::new(r"\.map$").unwrap(),
            ],
        )
    }

    fn rel(paths: impl Iterator<Item = PathBuf>, root: &Path) -> Vec<String> {
        paths.map(|p| display_relative(&p, root)).collect()
    }

    #[test]
    fn test_files_sorted_and_filtered() {
        let temp = fixture();
        let root = temp.path();
        let files = rel(scanner(root).files(), root);
        assert_eq!(files, [".well-known/security.txt", "a.HTML", "b/nested/c.js", "z.html"]);
    }

    #[test]
    fn test_files_is_restartable() {
        let temp = fixture();
        let scanner = scanner(temp.path());
        assert_eq!(scanner.files().count(), scanner.files().count());
    }

    #[test]
    fn test_lines_are_one_based() {
        let temp = fixture();
        let scanner = scanner(temp.path());
        let file = scanner.read(&temp.path().join("a.HTML")).unwrap();
        let lines: Vec<_> = file.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            Line {
                file: "a.HTML",
                number: 2,
                text: "line two"
            }
        );
    }

    #[test]
    fn test_binary_and_invalid_utf8_are_warnings() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bin.txt"), [b'a', 0, b'b']).unwrap();
        fs::write(temp.path().join("latin1.txt"), [0xE9u8, b'x']).unwrap();
        fs::write(temp.path().join("ok.txt"), "fine").unwrap();

        let scanner = Scanner::new(temp.path(), &strings(&["txt"]), Vec::new());
        let results: Vec<_> = scanner.scan().collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap_err().reason.contains("NUL"));
        assert!(results[1].as_ref().unwrap_err().reason.contains("UTF-8"));
        assert_eq!(results[2].as_ref().unwrap().text, "fine");
    }

    #[test]
    fn test_missing_root_is_finite() {
        let scanner = Scanner::new("/definitely/not/a/dir", &strings(&["txt"]), Vec::new());
        assert_eq!(scanner.files().count(), 0);
    }

    #[test]
    fn test_scan_does_not_mutate() {
        let temp = fixture();
        let before = scanner(temp.path()).files().count();
        let _ = scanner(temp.path()).scan().count();
        assert_eq!(scanner(temp.path()).files().count(), before);
        assert!(temp.path().join("b/e.png").exists());
    }
}
