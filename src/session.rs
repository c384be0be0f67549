//! Ordered folder list that is re-compared whenever it changes.

use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

use crate::compare_engine::{ComparisonReport, FileSystem, FolderComparator, LocalFileSystem, PathKind};
use crate::diagnostics::{DiagnosticLog, DEFAULT_MAX_LOG_LINES};
use crate::error_codes::{ERR_DIRECTORY_NOT_FOUND, ERR_NOT_A_DIRECTORY};
use crate::input_validation::validate_path_argument;
use crate::path_validation::sanitize_path;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("path is empty")]
    EmptyPath,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path does not exist: {0}")]
    NotFound(String),

    #[error("path is not a folder: {0}")]
    NotADirectory(String),

    #[error("folder is already in the list: {0}")]
    AlreadyAdded(String),

    #[error("no folder at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStatus {
    Compared,
    NeedMoreFolders { valid: usize },
}

impl ComparisonStatus {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Compared => None,
            Self::NeedMoreFolders { valid: 0 } => Some("Add folders to compare"),
            Self::NeedMoreFolders { valid: 1 } => Some("Add one more folder to compare"),
            Self::NeedMoreFolders { .. } => Some("Add at least two folders to compare"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub status: ComparisonStatus,
    pub report: ComparisonReport,
    /// Folders dropped from the list because they vanished or turned into files
    pub pruned: Vec<String>,
}

pub struct FolderSession<F: FileSystem = LocalFileSystem> {
    comparator: FolderComparator<F>,
    folders: Vec<String>,
    log: DiagnosticLog,
}

impl FolderSession {
    pub fn new() -> Self {
        Self::with_comparator(FolderComparator::default(), DEFAULT_MAX_LOG_LINES)
    }
}

impl Default for FolderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> FolderSession<F> {
    pub fn with_comparator(comparator: FolderComparator<F>, max_log_lines: usize) -> Self {
        Self {
            comparator,
            folders: Vec::new(),
            log: DiagnosticLog::new(max_log_lines),
        }
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Sanitize `raw` and append it if it names an existing folder that is
    /// not listed yet. Returns the stored form of the path.
    pub fn add_folder(&mut self, raw: &str) -> Result<&str, IntakeError> {
        if raw.trim().is_empty() {
            return Err(IntakeError::EmptyPath);
        }

        let path = sanitize_path(raw);
        validate_path_argument(&path).map_err(|e| IntakeError::InvalidPath(e.to_string()))?;

        match self.comparator.file_system().probe(Path::new(&path)) {
            Ok(PathKind::Directory) => {}
            Ok(PathKind::Missing) => return Err(IntakeError::NotFound(path)),
            Ok(PathKind::Other) => return Err(IntakeError::NotADirectory(path)),
            Err(e) => return Err(IntakeError::InvalidPath(format!("{path}: {e}"))),
        }

        if self.folders.contains(&path) {
            return Err(IntakeError::AlreadyAdded(path));
        }

        self.folders.push(path);
        Ok(self.folders.last().map(String::as_str).unwrap_or_default())
    }

    /// Remove folders by zero-based position. Nothing is removed if any
    /// position is out of range.
    pub fn remove_folders(&mut self, indices: &[usize]) -> Result<Vec<String>, IntakeError> {
        let len = self.folders.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(IntakeError::IndexOutOfRange { index, len });
        }

        let selected: BTreeSet<usize> = indices.iter().copied().collect();
        let mut removed = Vec::with_capacity(selected.len());
        let mut kept = Vec::with_capacity(len - selected.len());
        for (index, folder) in self.folders.drain(..).enumerate() {
            if selected.contains(&index) {
                removed.push(folder);
            } else {
                kept.push(folder);
            }
        }
        self.folders = kept;

        Ok(removed)
    }

    /// Compare the current list, record its diagnostics and drop folders
    /// that no longer exist or are no longer directories.
    pub async fn refresh(&mut self) -> SessionOutcome {
        let report = self.comparator.compare(&self.folders).await;
        self.log.record_batch(&report.diagnostics);

        let gone: BTreeSet<&str> = report
            .diagnostics
            .iter()
            .filter(|d| d.code == ERR_DIRECTORY_NOT_FOUND || d.code == ERR_NOT_A_DIRECTORY)
            .map(|d| d.path.as_str())
            .collect();

        let mut pruned = Vec::new();
        self.folders.retain(|folder| {
            if gone.contains(folder.as_str()) {
                pruned.push(folder.clone());
                false
            } else {
                true
            }
        });

        let valid = report.result.valid_directories.len();
        let status = if valid >= 2 {
            ComparisonStatus::Compared
        } else {
            ComparisonStatus::NeedMoreFolders { valid }
        };

        SessionOutcome {
            status,
            report,
            pruned,
        }
    }
}
