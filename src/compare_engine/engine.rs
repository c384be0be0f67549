use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::compare_engine::fs::{FileSystem, LocalFileSystem};
use crate::compare_engine::types::{CompareOptions, ComparisonResult, PresenceBitmask, ValidDirectory};
use crate::compare_engine::validator::validate_directories;
use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub result: ComparisonResult,
    pub diagnostics: Vec<Diagnostic>,
}

/// Groups every file name by the exact set of directories that contain it.
pub fn distribute(directories: &[ValidDirectory]) -> ComparisonResult {
    let valid_directories: Vec<String> = directories.iter().map(|d| d.path.clone()).collect();

    if directories.len() < 2 {
        return ComparisonResult::empty(valid_directories);
    }

    let union: BTreeSet<&str> = directories
        .iter()
        .flat_map(|d| d.entries.iter().map(String::as_str))
        .collect();

    if union.is_empty() {
        return ComparisonResult::empty(valid_directories);
    }

    // The union is walked in sorted order, so every group comes out sorted.
    let mut groups: HashMap<PresenceBitmask, Vec<String>> = HashMap::new();
    for name in union {
        let mut mask = PresenceBitmask::new(directories.len());
        for (index, directory) in directories.iter().enumerate() {
            if directory.entries.contains(name) {
                mask.set(index);
            }
        }
        groups.entry(mask).or_default().push(name.to_string());
    }

    let common_files = groups
        .remove(&PresenceBitmask::all_true(directories.len()))
        .unwrap_or_default();

    ComparisonResult {
        common_files,
        pattern_groups: groups,
        valid_directories,
    }
}

pub struct FolderComparator<F: FileSystem = LocalFileSystem> {
    fs: Arc<F>,
    options: CompareOptions,
}

impl Default for FolderComparator {
    fn default() -> Self {
        Self::new(CompareOptions::default())
    }
}

impl FolderComparator {
    pub fn new(options: CompareOptions) -> Self {
        Self::with_file_system(LocalFileSystem, options)
    }
}

impl<F: FileSystem> FolderComparator<F> {
    pub fn with_file_system(fs: F, options: CompareOptions) -> Self {
        Self {
            fs: Arc::new(fs),
            options,
        }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Validates `paths`, then distributes the names of the ones that
    /// survived. Always completes; bad paths end up in `diagnostics`.
    pub async fn compare(&self, paths: &[String]) -> ComparisonReport {
        let outcome = validate_directories(&self.fs, paths, &self.options).await;

        ComparisonReport {
            result: distribute(&outcome.directories),
            diagnostics: outcome.exclusions.iter().map(Diagnostic::from_exclusion).collect(),
        }
    }
}
