use super::backend::{FsBackend, FsEntry, FsEntryType, ListOptions};
use async_trait::async_trait;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

/// Local filesystem implementation of [`FsBackend`] backed by `tokio::fs`.
#[derive(Debug, Default)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    pub fn new() -> Self {
        Self
    }
}

fn classify(file_type: FileType) -> FsEntryType {
    if file_type.is_symlink() {
        FsEntryType::Symlink
    } else if file_type.is_dir() {
        FsEntryType::Directory
    } else if file_type.is_file() {
        FsEntryType::File
    } else {
        FsEntryType::Unknown
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Load the `.gitignore` governing `dir`, if one exists.
///
/// A malformed file is logged and treated as absent rather than failing
/// the enumeration.
fn load_gitignore(dir: &Path) -> Option<Gitignore> {
    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(dir);
    builder.add(&gitignore_path);
    match builder.build() {
        Ok(gitignore) => Some(gitignore),
        Err(e) => {
            tracing::warn!("failed to parse {:?}: {}", gitignore_path, e);
            None
        }
    }
}

#[async_trait]
impl FsBackend for LocalFsBackend {
    async fn list_dir(&self, path: &Path, options: &ListOptions) -> io::Result<Vec<FsEntry>> {
        let mut read_dir = tokio::fs::read_dir(path).await?;
        let gitignore = if options.respect_ignore {
            load_gitignore(path)
        } else {
            None
        };
        let pattern = options.name_pattern.as_ref().map(|p| p.to_lowercase());

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();

            if !options.show_hidden && is_hidden(&name) {
                continue;
            }

            let entry_type = match entry.file_type().await {
                Ok(file_type) => classify(file_type),
                Err(e) => {
                    tracing::warn!("cannot classify {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            let is_dir = entry_type == FsEntryType::Directory;

            if is_dir && !options.include_dirs {
                continue;
            }
            if let Some(gitignore) = &gitignore {
                if gitignore.matched(Path::new(&name), is_dir).is_ignore() {
                    continue;
                }
            }
            if let Some(pattern) = &pattern {
                if !is_dir && !name.to_lowercase().contains(pattern.as_str()) {
                    continue;
                }
            }

            entries.push(FsEntry::new(entry.path(), name, entry_type));
        }

        Ok(entries)
    }

    async fn stat(&self, path: &Path) -> io::Result<FsEntryType> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        Ok(classify(metadata.file_type()))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::symlink_metadata(path).await.is_ok()
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::read_link(path).await
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }
}
