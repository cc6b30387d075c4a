use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Result of resolving the initial load queue for a full traversal.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResolvedExpansion {
    /// Folders to scan after the root, in order.
    pub queue: VecDeque<PathBuf>,
    /// Reveal-target ancestors that must also render expanded.
    pub reveal_dirs: Vec<PathBuf>,
}

/// Compute the folders a full load must visit beyond the root.
///
/// The queue starts from the presentation layer's currently expanded set
/// (empty on first render), followed by the reveal target's ancestor
/// directories, nearest the root first. Duplicates keep their first
/// occurrence.
pub fn resolve(expanded: &[PathBuf], reveal: Option<&Path>, root: &Path) -> ResolvedExpansion {
    let mut pending: Vec<PathBuf> = expanded.to_vec();
    let mut reveal_dirs = Vec::new();

    if let Some(target) = reveal {
        for dir in ancestors_inside(target, root) {
            pending.push(dir.clone());
            reveal_dirs.push(dir);
        }
    }

    let mut seen = HashSet::new();
    let queue = pending
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect();

    ResolvedExpansion { queue, reveal_dirs }
}

/// Ancestor directories of `target` (the target itself excluded) strictly
/// inside `root`, ordered nearest-to-root first.
fn ancestors_inside(target: &Path, root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = target
        .ancestors()
        .skip(1)
        .take_while(|p| p.starts_with(root) && *p != root)
        .map(Path::to_path_buf)
        .collect();
    dirs.reverse();
    dirs
}
