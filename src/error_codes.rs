//! Stable codes attached to diagnostics so frontends can translate them.

/// Input path does not exist
pub const ERR_DIRECTORY_NOT_FOUND: &str = "ERR_DIRECTORY_NOT_FOUND";

/// Input path exists but is not a directory
pub const ERR_NOT_A_DIRECTORY: &str = "ERR_NOT_A_DIRECTORY";

/// Directory could not be listed (permissions, I/O error, timeout)
pub const ERR_CANNOT_READ_DIRECTORY: &str = "ERR_CANNOT_READ_DIRECTORY";
