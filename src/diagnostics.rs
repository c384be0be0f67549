use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compare_engine::types::ExclusionReason;

/// Default maximum number of diagnostics a session keeps
pub const DEFAULT_MAX_LOG_LINES: usize = 10000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub timestamp: DateTime<Utc>,
    pub level: DiagnosticLevel,
    pub code: String,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn from_exclusion(reason: &ExclusionReason) -> Self {
        let level = if reason.is_permanent() {
            DiagnosticLevel::Warning
        } else {
            DiagnosticLevel::Error
        };

        Self {
            timestamp: Utc::now(),
            level,
            code: reason.code().to_string(),
            path: reason.path().to_string(),
            message: reason.to_string(),
        }
    }
}

/// Bounded history of diagnostics across several comparisons.
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    max_lines: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_LINES)
    }
}

impl DiagnosticLog {
    pub fn new(max_lines: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
        }
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.entries.push_back(diagnostic);
        self.rotate();
    }

    /// Add multiple diagnostics at once, e.g. everything from one comparison
    pub fn record_batch(&mut self, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }

        self.entries.extend(diagnostics.iter().cloned());
        self.rotate();
    }

    fn rotate(&mut self) {
        // Remove from front if full
        while self.entries.len() > self.max_lines {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self, level: Option<DiagnosticLevel>) -> Vec<Diagnostic> {
        match level {
            Some(level) => self.entries.iter().filter(|d| d.level == level).cloned().collect(),
            None => self.entries.iter().cloned().collect(),
        }
    }

    pub fn entries_paginated(&self, offset: usize, limit: usize) -> Vec<Diagnostic> {
        self.entries.iter().skip(offset).take(limit).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
