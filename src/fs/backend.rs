use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of filesystem entry as reported by a backend.
///
/// `Symlink` is the raw classification; callers that care about what the
/// link points at resolve it separately via [`FsBackend::canonicalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEntryType {
    File,
    Directory,
    Symlink,
    Unknown,
}

/// A single entry discovered during directory enumeration.
#[derive(Debug, Clone)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub entry_type: FsEntryType,
}

impl FsEntry {
    pub fn new(path: PathBuf, name: String, entry_type: FsEntryType) -> Self {
        Self {
            path,
            name,
            entry_type,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == FsEntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == FsEntryType::File
    }
}

/// Options for a single depth-1 directory enumeration.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
    /// Honor the listed directory's `.gitignore`.
    pub respect_ignore: bool,
    /// Case-insensitive substring filter on entry names. Directories are
    /// kept regardless when `include_dirs` is set, so lazy expansion
    /// stays reachable under an active filter.
    pub name_pattern: Option<String>,
    /// Include directory entries in the result.
    pub include_dirs: bool,
}

/// Async filesystem backend trait
///
/// Abstracts the enumeration and classification primitives the tree model
/// needs, so it can run against the local filesystem, a network mount
/// wrapper, or an in-memory fake in tests.
#[async_trait]
pub trait FsBackend: Send + Sync {
    /// Enumerate the direct children of `path` (depth 1, any order).
    ///
    /// Filtering (hidden entries, gitignore, name pattern) is the
    /// backend's responsibility; the caller receives only entries that
    /// passed the options.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory itself cannot be read
    /// (permission denied, doesn't exist, not a directory, etc.).
    /// Per-entry classification failures are not errors; such entries
    /// are simply absent from the result.
    async fn list_dir(&self, path: &Path, options: &ListOptions) -> io::Result<Vec<FsEntry>>;

    /// Classify a single path without following symlinks.
    async fn stat(&self, path: &Path) -> io::Result<FsEntryType>;

    /// Whether the path currently exists (symlinks count even if broken).
    async fn exists(&self, path: &Path) -> bool;

    /// Read a symlink's stored target, without resolving it.
    async fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Get the canonical (absolute, fully resolved) path.
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_entry_creation() {
        let entry = FsEntry::new(
            PathBuf::from("/test/file.txt"),
            "file.txt".to_string(),
            FsEntryType::File,
        );

        assert_eq!(entry.name, "file.txt");
        assert!(entry.is_file());
        assert!(!entry.is_dir());
    }

    #[test]
    fn test_entry_types_are_distinct() {
        assert_ne!(FsEntryType::File, FsEntryType::Directory);
        assert_ne!(FsEntryType::Symlink, FsEntryType::Unknown);
    }

    #[test]
    fn test_list_options_default() {
        let options = ListOptions::default();
        assert!(!options.show_hidden);
        assert!(!options.respect_ignore);
        assert!(options.name_pattern.is_none());
        assert!(!options.include_dirs);
    }
}
