use crate::fs::FsEntryType;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Kind of node in the explorer tree.
///
/// Variant order doubles as the sibling sort rank: directories, then
/// files, then links and unknowns, matching the alphabetical order of the
/// kind labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
    Link,
    Unknown,
}

impl NodeKind {
    /// Stable lowercase label, used as the sort key for sibling ordering.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
            NodeKind::Link => "link",
            NodeKind::Unknown => "unknown",
        }
    }
}

impl From<FsEntryType> for NodeKind {
    fn from(entry_type: FsEntryType) -> Self {
        match entry_type {
            FsEntryType::File => NodeKind::File,
            FsEntryType::Directory => NodeKind::Directory,
            FsEntryType::Symlink => NodeKind::Link,
            FsEntryType::Unknown => NodeKind::Unknown,
        }
    }
}

/// A node in the explorer tree.
///
/// Nodes live in the per-invocation arena and refer to each other by
/// path, never by pointer; the absolute path doubles as the node id.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    /// Absolute path; unique within an invocation.
    pub path: PathBuf,
    pub name: String,
    /// Parent path; `None` only for the invocation root.
    pub parent: Option<PathBuf>,
    pub kind: NodeKind,
    /// Final dot-separated token of the name (files only).
    pub extension: Option<String>,
    /// Resolved real target path, when this node is a symlink.
    pub link_target: Option<PathBuf>,
    /// Kind of the symlink target, when resolvable.
    pub link_kind: Option<NodeKind>,
    /// Ordered child ids (directories only).
    pub children: Vec<PathBuf>,
    /// Whether a full enumeration of this directory has completed within
    /// the current invocation.
    pub loaded: bool,
}

impl TreeNode {
    pub fn new(path: PathBuf, kind: NodeKind, parent: Option<PathBuf>) -> Self {
        let name = name_of(&path);
        let extension = if kind == NodeKind::File {
            extension_of(&name)
        } else {
            None
        };

        Self {
            path,
            name,
            parent,
            kind,
            extension,
            link_target: None,
            link_kind: None,
            children: Vec::new(),
            loaded: false,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Display name for a path: the final component, or the path itself for
/// filesystem roots.
pub(crate) fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Extension per the trailing dot-suffix convention.
///
/// `archive.tar.gz` yields `gz`; `Makefile` and dotfiles like `.bashrc`
/// yield nothing.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_matches_labels() {
        let mut kinds = [
            NodeKind::Unknown,
            NodeKind::File,
            NodeKind::Directory,
            NodeKind::Link,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            [
                NodeKind::Directory,
                NodeKind::File,
                NodeKind::Link,
                NodeKind::Unknown
            ]
        );

        let mut labels: Vec<_> = kinds.iter().map(|k| k.label()).collect();
        labels.sort();
        assert_eq!(labels, vec!["directory", "file", "link", "unknown"]);
    }

    #[test]
    fn test_file_node_derives_extension() {
        let node = TreeNode::new(
            PathBuf::from("/r/archive.tar.gz"),
            NodeKind::File,
            Some(PathBuf::from("/r")),
        );
        assert_eq!(node.name, "archive.tar.gz");
        assert_eq!(node.extension.as_deref(), Some("gz"));
    }

    #[test]
    fn test_directory_node_has_no_extension() {
        let node = TreeNode::new(
            PathBuf::from("/r/v1.2"),
            NodeKind::Directory,
            Some(PathBuf::from("/r")),
        );
        assert!(node.extension.is_none());
        assert!(node.is_dir());
        assert!(!node.loaded);
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(extension_of("main.rs").as_deref(), Some("rs"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_root_name_falls_back_to_path() {
        let node = TreeNode::new(PathBuf::from("/"), NodeKind::Directory, None);
        assert_eq!(node.name, "/");
        assert!(node.parent.is_none());
    }
}
