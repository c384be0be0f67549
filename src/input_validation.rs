//! Input validation for folder paths and comparison settings
//!
//! Rejects values that can never name a usable folder or that would make a
//! comparison misbehave, before any filesystem access happens.

use anyhow::{bail, Result};

/// Maximum allowed path length
pub const MAX_PATH_LENGTH: usize = 4096;

/// Upper bound for a per-directory listing deadline (one hour)
pub const MAX_LISTING_TIMEOUT_MS: u64 = 3_600_000;

/// Upper bound for concurrent directory listings
pub const MAX_PARALLEL_LISTINGS: usize = 256;

/// Validate a folder path argument
///
/// Paths are expected to be sanitized already; this only rejects strings no
/// filesystem will accept.
pub fn validate_path_argument(path: &str) -> Result<()> {
    if path.len() > MAX_PATH_LENGTH {
        bail!(
            "Path too long: {} bytes (max: {})",
            path.len(),
            MAX_PATH_LENGTH
        );
    }

    if path.contains('\0') {
        bail!("Path contains null byte");
    }

    if path.contains('\n') || path.contains('\r') {
        bail!("Path contains line breaks");
    }

    Ok(())
}

pub fn validate_listing_timeout_ms(timeout_ms: u64) -> Result<()> {
    if timeout_ms == 0 {
        bail!("Listing timeout must be at least 1 ms");
    }

    if timeout_ms > MAX_LISTING_TIMEOUT_MS {
        bail!(
            "Listing timeout too large: {} ms (max: {})",
            timeout_ms,
            MAX_LISTING_TIMEOUT_MS
        );
    }

    Ok(())
}

pub fn validate_parallel_listings(count: usize) -> Result<()> {
    if count == 0 || count > MAX_PARALLEL_LISTINGS {
        bail!(
            "Parallel listings must be between 1 and {}: got {}",
            MAX_PARALLEL_LISTINGS,
            count
        );
    }

    Ok(())
}
