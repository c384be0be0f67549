use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::compare_engine::types::EntrySet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    Directory,
    Other,
}

/// The filesystem queries the comparator needs and nothing more.
///
/// Calls are blocking; the validator runs them on the blocking thread pool.
pub trait FileSystem: Send + Sync + 'static {
    fn probe(&self, path: &Path) -> io::Result<PathKind>;

    /// Names of the immediate children of `path`, files and directories alike.
    fn list_entries(&self, path: &Path) -> io::Result<EntrySet>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn probe(&self, path: &Path) -> io::Result<PathKind> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(PathKind::Directory),
            Ok(_) => Ok(PathKind::Other),
            Err(e) if resolves_to_nothing(&e) => Ok(PathKind::Missing),
            Err(e) => Err(e),
        }
    }

    fn list_entries(&self, path: &Path) -> io::Result<EntrySet> {
        let mut entries = EntrySet::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // Non UTF-8 names are kept in lossy form rather than dropped.
            entries.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(entries)
    }
}

/// Errors meaning the path names no filesystem entry at all, e.g. a
/// component below a regular file or a symlink loop.
fn resolves_to_nothing(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
        || err.raw_os_error().is_some_and(is_unresolvable_errno)
}

#[cfg(unix)]
fn is_unresolvable_errno(code: i32) -> bool {
    use nix::errno::Errno;

    matches!(
        Errno::from_raw(code),
        Errno::ENOTDIR | Errno::ELOOP | Errno::ENAMETOOLONG
    )
}

#[cfg(not(unix))]
fn is_unresolvable_errno(_code: i32) -> bool {
    false
}

#[derive(Debug, Clone)]
enum MemoryNode {
    Directory(EntrySet),
    File,
    Unreadable(io::ErrorKind, String),
}

/// Fixed directory tree held in memory. Handy for callers that want to
/// exercise the comparator without touching disk.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSystem {
    nodes: HashMap<PathBuf, MemoryNode>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir<I, S>(mut self, path: impl Into<PathBuf>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries.into_iter().map(Into::into).collect();
        self.nodes.insert(path.into(), MemoryNode::Directory(entries));
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.nodes.insert(path.into(), MemoryNode::File);
        self
    }

    /// A directory that exists but fails to list with the given error.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind, message: &str) -> Self {
        self.nodes
            .insert(path.into(), MemoryNode::Unreadable(kind, message.to_string()));
        self
    }
}

impl FileSystem for InMemoryFileSystem {
    fn probe(&self, path: &Path) -> io::Result<PathKind> {
        Ok(match self.nodes.get(path) {
            None => PathKind::Missing,
            Some(MemoryNode::File) => PathKind::Other,
            Some(_) => PathKind::Directory,
        })
    }

    fn list_entries(&self, path: &Path) -> io::Result<EntrySet> {
        match self.nodes.get(path) {
            Some(MemoryNode::Directory(entries)) => Ok(entries.clone()),
            Some(MemoryNode::Unreadable(kind, message)) => Err(io::Error::new(*kind, message.clone())),
            Some(MemoryNode::File) => Err(io::Error::new(io::ErrorKind::Other, "not a directory")),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}
