pub mod compare_engine;
pub mod config;
pub mod diagnostics;
pub mod error_codes;
pub mod input_validation;
pub mod path_validation;
pub mod report;
pub mod session;

#[cfg(test)]
mod lib_tests;

use compare_engine::{CompareOptions, ComparisonReport, FolderComparator};
use path_validation::sanitize_path;

/// Sanitize raw folder strings and compare them on the local filesystem.
pub async fn compare_paths(raw_paths: &[String], options: CompareOptions) -> ComparisonReport {
    let paths: Vec<String> = raw_paths.iter().map(|p| sanitize_path(p)).collect();
    FolderComparator::new(options).compare(&paths).await
}
