use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::compare_engine::fs::{FileSystem, PathKind};
use crate::compare_engine::types::{CompareOptions, ExclusionReason, ValidDirectory};

/// Directories that passed validation, in input order, plus one exclusion
/// per input that did not.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub directories: Vec<ValidDirectory>,
    pub exclusions: Vec<ExclusionReason>,
}

/// Probes and lists every input path concurrently and waits for all of them.
///
/// A bad path never fails the call; it is dropped and reported through
/// `exclusions`.
pub async fn validate_directories<F: FileSystem>(
    fs: &Arc<F>,
    paths: &[String],
    options: &CompareOptions,
) -> ValidationOutcome {
    let semaphore = Arc::new(Semaphore::new(options.max_parallel_listings.max(1)));
    let mut handles = Vec::with_capacity(paths.len());

    for path in paths {
        let fs = Arc::clone(fs);
        let semaphore = Arc::clone(&semaphore);
        let path = path.clone();
        let timeout = options.listing_timeout;
        handles.push(tokio::spawn(inspect_directory(fs, semaphore, path, timeout)));
    }

    let mut outcome = ValidationOutcome::default();
    for (path, handle) in paths.iter().zip(handles) {
        let inspected = handle.await.unwrap_or_else(|e| {
            Err(ExclusionReason::ListingFailure {
                path: path.clone(),
                cause: e.to_string(),
            })
        });

        match inspected {
            Ok(directory) => outcome.directories.push(directory),
            Err(reason) => outcome.exclusions.push(reason),
        }
    }

    outcome
}

/// The permit travels into the blocking task, so a listing abandoned after a
/// timeout still occupies its slot until the filesystem call returns.
async fn inspect_directory<F: FileSystem>(
    fs: Arc<F>,
    semaphore: Arc<Semaphore>,
    path: String,
    timeout: Option<Duration>,
) -> Result<ValidDirectory, ExclusionReason> {
    let permit = semaphore.acquire_owned().await;
    let task_path = path.clone();
    let listing = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        probe_and_list(fs.as_ref(), task_path)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, listing).await {
            Ok(joined) => joined,
            Err(_) => {
                return Err(ExclusionReason::ListingFailure {
                    path,
                    cause: format!("listing timed out after {} ms", limit.as_millis()),
                })
            }
        },
        None => listing.await,
    };

    joined.unwrap_or_else(|e| {
        Err(ExclusionReason::ListingFailure {
            path,
            cause: e.to_string(),
        })
    })
}

fn probe_and_list<F: FileSystem + ?Sized>(fs: &F, path: String) -> Result<ValidDirectory, ExclusionReason> {
    let target = Path::new(&path);

    match fs.probe(target) {
        Ok(PathKind::Directory) => {}
        Ok(PathKind::Missing) => return Err(ExclusionReason::NotFound { path }),
        Ok(PathKind::Other) => return Err(ExclusionReason::NotADirectory { path }),
        Err(e) => {
            return Err(ExclusionReason::ListingFailure {
                path,
                cause: e.to_string(),
            })
        }
    }

    match fs.list_entries(target) {
        Ok(entries) => Ok(ValidDirectory { path, entries }),
        Err(e) => Err(ExclusionReason::ListingFailure {
            path,
            cause: e.to_string(),
        }),
    }
}
