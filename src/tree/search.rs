//! Search-mode tree population.
//!
//! Instead of scanning directories, this driver drains the search
//! collaborator's event stream and grafts each match into the tree.
//! Reported types are ignored; every match is re-classified with a stat
//! call so a stale external index cannot misfile an entry. Ancestor
//! folders come into existence through linking alone and are rendered
//! expanded without ever being marked loaded.

use super::build;
use super::context::TreeContext;
use crate::fs::{FsBackend, SearchBackend, SearchEvent, SearchRequest};

/// Flatten one search run into the context's tree.
///
/// The collaborator closing its stream is the completion signal;
/// per-event errors are logged and the stream continues.
pub async fn run(
    ctx: &mut TreeContext,
    fs: &dyn FsBackend,
    search: &dyn SearchBackend,
    request: &SearchRequest,
) {
    let mut events = search.search(request).await;

    while let Some(event) = events.recv().await {
        match event {
            SearchEvent::Match(path) => {
                build::create_and_attach(ctx, fs, &path, None).await;
            }
            SearchEvent::Error(message) => {
                tracing::warn!("search error: {}", message);
            }
        }
    }
}
