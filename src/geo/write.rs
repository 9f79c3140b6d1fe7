//! Materializing a generation on disk.
//!
//! Files are only rewritten when their blake3 content hash differs from the
//! bytes already on disk, so an unchanged dataset leaves mtimes untouched.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::generate::Generation;
use crate::debug;
use crate::utils::hash::{ContentHash, Digest};

/// A file the generation wants on disk.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Where the generation lands.
#[derive(Debug, Clone, Copy)]
pub struct OutputLayout<'a> {
    pub pages_dir: &'a Path,
    pub manifest: &'a Path,
    pub extension: &'a str,
}

/// Page wrappers followed by the manifest, in generation order.
pub fn plan(generation: &Generation, manifest: String, layout: OutputLayout<'_>) -> Vec<PlannedFile> {
    let mut files: Vec<PlannedFile> = generation
        .files
        .iter()
        .map(|file| PlannedFile {
            path: layout.pages_dir.join(&file.file_name),
            contents: file.contents.clone(),
        })
        .collect();
    files.push(PlannedFile {
        path: layout.manifest.to_path_buf(),
        contents: manifest,
    });
    files
}

/// Digest over every planned file, keyed by file name.
pub fn digest(files: &[PlannedFile]) -> ContentHash {
    let mut digest = Digest::new();
    for file in files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        digest.update(&name, file.contents.as_bytes());
    }
    digest.finish()
}

/// On-disk state of one planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Unchanged,
    Changed,
    Missing,
}

pub fn file_state(file: &PlannedFile) -> FileState {
    match ContentHash::of_file(&file.path) {
        None => FileState::Missing,
        Some(hash) if hash == ContentHash::of(file.contents.as_bytes()) => FileState::Unchanged,
        Some(_) => FileState::Changed,
    }
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: usize,
    pub removed: Vec<PathBuf>,
}

/// Write every planned file whose contents differ from disk.
pub fn write_files(files: &[PlannedFile]) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for file in files {
        if file_state(file) == FileState::Unchanged {
            debug!("generate"; "unchanged {}", file.path.display());
            summary.unchanged += 1;
            continue;
        }
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&file.path, &file.contents)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;
        summary.written.push(file.path.clone());
    }
    Ok(summary)
}

/// Result of comparing planned files against disk without writing.
#[derive(Debug, Default)]
pub struct CheckSummary {
    pub missing: Vec<PathBuf>,
    pub changed: Vec<PathBuf>,
}

impl CheckSummary {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.changed.is_empty()
    }
}

pub fn check_files(files: &[PlannedFile]) -> CheckSummary {
    let mut summary = CheckSummary::default();
    for file in files {
        match file_state(file) {
            FileState::Unchanged => {}
            FileState::Changed => summary.changed.push(file.path.clone()),
            FileState::Missing => summary.missing.push(file.path.clone()),
        }
    }
    summary
}

/// Generated-looking files in the pages directory that this generation does not produce.
///
/// Only direct children named `Hub*` or `Neighborhood*` with the configured
/// extension are considered; hand-written pages are never touched.
pub fn find_stale(generation: &Generation, layout: OutputLayout<'_>) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(layout.pages_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read {}", layout.pages_dir.display()));
        }
    };

    let mut stale = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext_matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(layout.extension));
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let looks_generated = name.starts_with("Hub") || name.starts_with("Neighborhood");
        if ext_matches
            && looks_generated
            && !generation.files.iter().any(|f| f.file_name == name)
        {
            stale.push(path);
        }
    }
    stale.sort();
    Ok(stale)
}

/// Delete stale files, returning the removed paths.
pub fn remove_stale(stale: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::with_capacity(stale.len());
    for path in stale {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!("generate"; "removed {}", path.display());
        removed.push(path.clone());
    }
    Ok(removed)
}
