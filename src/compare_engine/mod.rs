pub mod engine;
pub mod fs;
pub mod types;
pub mod validator;

pub use engine::{distribute, ComparisonReport, FolderComparator};
pub use fs::{FileSystem, InMemoryFileSystem, LocalFileSystem, PathKind};
pub use types::{CompareOptions, ComparisonResult, EntrySet, ExclusionReason, PresenceBitmask, ValidDirectory};
pub use validator::{validate_directories, ValidationOutcome};
