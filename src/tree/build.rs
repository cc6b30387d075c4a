//! Node construction and linking.
//!
//! Everything that creates a node or forms a parent/child edge lives
//! here. Construction classifies a path (trusting the enumeration's
//! reported type when present, stat-ing otherwise) and linking walks the
//! path-keyed arena iteratively, creating missing ancestor directories on
//! demand. The walk terminates because the invocation root is registered
//! before any other node.

use super::context::TreeContext;
use super::node::{NodeKind, TreeNode};
use crate::fs::{FsBackend, FsEntryType};
use std::path::{Path, PathBuf};

/// Construct the node for `path` and attach it to the tree.
///
/// Returns the node id, or `None` when the entry had to be skipped.
/// Skips are never fatal to the surrounding batch.
pub async fn create_and_attach(
    ctx: &mut TreeContext,
    backend: &dyn FsBackend,
    path: &Path,
    kind_hint: Option<FsEntryType>,
) -> Option<PathBuf> {
    let id = create_node(ctx, backend, path, kind_hint).await?;
    attach(ctx, &id);
    Some(id)
}

/// Build and register the node for `path`.
///
/// A path already in the arena is returned as-is so a revisit cannot
/// clobber its `loaded` state or children. Symlinks resolve their real
/// target and, when the target is classifiable, adopt its kind for tree
/// placement while keeping the link metadata.
pub async fn create_node(
    ctx: &mut TreeContext,
    backend: &dyn FsBackend,
    path: &Path,
    kind_hint: Option<FsEntryType>,
) -> Option<PathBuf> {
    if !path.starts_with(&ctx.root) {
        tracing::warn!("skipping {:?}: outside the load root {:?}", path, ctx.root);
        return None;
    }
    if ctx.contains(path) {
        return Some(path.to_path_buf());
    }

    let reported = match kind_hint {
        Some(kind) => kind,
        None => match backend.stat(path).await {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!("cannot classify {:?}: {}", path, e);
                return None;
            }
        },
    };

    let mut kind = NodeKind::from(reported);
    let mut link_target = None;
    let mut link_kind = None;
    if reported == FsEntryType::Symlink {
        if let Ok(real) = backend.canonicalize(path).await {
            match backend.stat(&real).await {
                Ok(target_type) => {
                    let resolved = NodeKind::from(target_type);
                    kind = resolved;
                    link_kind = Some(resolved);
                }
                Err(e) => {
                    tracing::debug!("unresolvable link target {:?}: {}", real, e);
                }
            }
            link_target = Some(real);
        }
    }

    let parent = if path == ctx.root {
        None
    } else {
        path.parent().map(Path::to_path_buf)
    };
    let mut node = TreeNode::new(path.to_path_buf(), kind, parent);
    node.link_target = link_target;
    node.link_kind = link_kind;

    if node.is_dir() && ctx.searching {
        ctx.mark_default_expanded(path);
    }
    ctx.insert(node);

    Some(path.to_path_buf())
}

/// Attach `id` to its parent, creating missing ancestor directories.
///
/// Idempotent per id: an already-linked node (an open folder being
/// revisited) is left alone. This is the only place parent/child edges
/// are formed.
pub fn attach(ctx: &mut TreeContext, id: &Path) {
    if ctx.is_linked(id) {
        return;
    }
    let Some(parent) = ctx.node(id).and_then(|n| n.parent.clone()) else {
        // Root only; the root is never a child of anything.
        return;
    };

    // Collect the ancestors missing from the arena, nearest-first. The
    // walk is iterative so a deep chain cannot grow the stack.
    let mut missing: Vec<PathBuf> = Vec::new();
    let mut cursor = parent;
    while !ctx.contains(&cursor) {
        if !cursor.starts_with(&ctx.root) {
            tracing::warn!(
                "cannot attach {:?}: ancestor {:?} escapes the load root",
                id,
                cursor
            );
            return;
        }
        missing.push(cursor.clone());
        match cursor.parent() {
            Some(p) => cursor = p.to_path_buf(),
            None => {
                tracing::warn!("cannot attach {:?}: no registered ancestor", id);
                return;
            }
        }
    }

    // Create and link the missing chain from the topmost ancestor down,
    // so every link step finds its parent already present.
    for dir in missing.into_iter().rev() {
        register_directory(ctx, &dir);
        link_to_parent(ctx, &dir);
    }
    link_to_parent(ctx, id);
}

/// Register an implicit, not-yet-loaded directory node.
fn register_directory(ctx: &mut TreeContext, path: &Path) {
    if ctx.contains(path) {
        return;
    }
    let parent = if path == ctx.root {
        None
    } else {
        path.parent().map(Path::to_path_buf)
    };
    let node = TreeNode::new(path.to_path_buf(), NodeKind::Directory, parent);
    if ctx.searching {
        ctx.mark_default_expanded(path);
    }
    ctx.insert(node);
}

fn link_to_parent(ctx: &mut TreeContext, id: &Path) {
    if ctx.is_linked(id) {
        return;
    }
    let Some(parent) = ctx.node(id).and_then(|n| n.parent.clone()) else {
        return;
    };
    let Some(parent_node) = ctx.node_mut(&parent) else {
        return;
    };
    if !parent_node.is_dir() {
        tracing::warn!("cannot attach {:?}: parent {:?} is not a directory", id, parent);
        return;
    }
    parent_node.children.push(id.to_path_buf());
    ctx.mark_linked(id.to_path_buf());
}
