//! Queue-driven directory scanning.
//!
//! One enumeration is in flight at a time: each completed batch links its
//! entries, marks the folder loaded, and only then pulls the next
//! still-valid folder off the pending queue. The explicit loop (rather
//! than recursive chaining) keeps stack depth flat regardless of how many
//! folders the restore set or reveal path queued.

use super::build;
use super::context::TreeContext;
use crate::fs::{FsBackend, ListOptions};
use std::path::{Path, PathBuf};

/// Scan `start` and then every folder the queue yields, sequentially.
pub async fn scan(
    ctx: &mut TreeContext,
    backend: &dyn FsBackend,
    options: &ListOptions,
    start: PathBuf,
) {
    let mut current = start;
    loop {
        scan_one(ctx, backend, options, &current).await;
        match next_pending(ctx, backend).await {
            Some(next) => current = next,
            None => break,
        }
    }
}

/// Enumerate one folder and link its children.
///
/// An unreadable folder is logged and treated as an empty batch; the
/// folder still counts as loaded so the scan cycle terminates.
async fn scan_one(ctx: &mut TreeContext, backend: &dyn FsBackend, options: &ListOptions, dir: &Path) {
    let entries = match backend.list_dir(dir, options).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("failed to read {:?}: {}", dir, e);
            Vec::new()
        }
    };

    for entry in entries {
        build::create_and_attach(ctx, backend, &entry.path, Some(entry.entry_type)).await;
    }

    // Defensive: the folder should always still be in the arena.
    if let Some(node) = ctx.node_mut(dir) {
        node.loaded = true;
    }
}

/// Pop the next queue entry that still exists and is not yet loaded.
async fn next_pending(ctx: &mut TreeContext, backend: &dyn FsBackend) -> Option<PathBuf> {
    while let Some(candidate) = ctx.queue.pop_front() {
        if ctx.node(&candidate).map(|n| n.loaded).unwrap_or(false) {
            continue;
        }
        if !backend.exists(&candidate).await {
            tracing::trace!("dropping vanished queue entry {:?}", candidate);
            continue;
        }
        return Some(candidate);
    }
    None
}
