//! Load orchestration.
//!
//! A [`TreeLoader`] owns the explorer root, the two collaborators and the
//! presentation sink. Every [`TreeLoader::load`] call runs in a fresh
//! [`TreeContext`] so concurrent invocations cannot interfere; an
//! invocation that has been superseded still runs to completion, but its
//! emission is dropped at the epoch check instead of reaching the sink.

use super::context::TreeContext;
use super::node::{NodeKind, TreeNode};
use super::{expand, scan, search, sort};
use crate::config::ExplorerConfig;
use crate::fs::{FsBackend, ListOptions, SearchBackend, SearchRequest};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Inputs for one load invocation.
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// Load only this folder's direct children (incremental expand).
    /// `None` loads the configured root.
    pub parent_id: Option<PathBuf>,
    /// Path whose ancestor folders must be loaded so it becomes visible.
    pub reveal: Option<PathBuf>,
    /// Folders the presentation layer currently shows expanded.
    pub expanded: Vec<PathBuf>,
    /// Active name filter typed in the explorer, if any.
    pub name_pattern: Option<String>,
}

impl LoadRequest {
    /// A plain full load of the configured root.
    pub fn full() -> Self {
        Self::default()
    }

    /// An incremental load of one folder's children.
    pub fn children_of(parent_id: impl Into<PathBuf>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }
}

/// One handoff to the presentation sink.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeUpdate {
    /// Full-tree replacement: every reachable node in depth-first order,
    /// root first, plus the folders to render expanded.
    Full {
        nodes: Vec<TreeNode>,
        default_expanded: Vec<PathBuf>,
    },
    /// Direct children of one folder, for an incremental expand.
    Children {
        parent: PathBuf,
        nodes: Vec<TreeNode>,
    },
}

type BeforeFullEmit = Box<dyn Fn() + Send + Sync>;

/// Orchestrates tree loads and search flattening for one explorer root.
pub struct TreeLoader {
    root: PathBuf,
    fs: Arc<dyn FsBackend>,
    search: Arc<dyn SearchBackend>,
    config: ExplorerConfig,
    sink: mpsc::UnboundedSender<TreeUpdate>,
    before_full_emit: Option<BeforeFullEmit>,
    epoch: AtomicU64,
}

impl TreeLoader {
    pub fn new(
        root: PathBuf,
        fs: Arc<dyn FsBackend>,
        search: Arc<dyn SearchBackend>,
        config: ExplorerConfig,
        sink: mpsc::UnboundedSender<TreeUpdate>,
    ) -> Self {
        Self {
            root,
            fs,
            search,
            config,
            sink,
            before_full_emit: None,
            epoch: AtomicU64::new(0),
        }
    }

    /// Register a hook to run once before every full-tree emission.
    pub fn with_before_full_emit(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_full_emit = Some(Box::new(hook));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the tree (or one folder, or the search view) and emit the
    /// result to the sink.
    ///
    /// Infallible from the caller's perspective: an unreadable root emits
    /// a root-only update, and every per-entry failure is absorbed where
    /// it happens. Only completions from the newest invocation reach the
    /// sink.
    pub async fn load(&self, request: LoadRequest) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let load_path = request
            .parent_id
            .clone()
            .unwrap_or_else(|| self.root.clone());
        let searching = self.config.search.is_some();

        let mut ctx = TreeContext::new(epoch, load_path.clone(), searching);

        // Synthetic invocation root: forced directory, considered loaded
        // and expanded from the start.
        let mut root_node = TreeNode::new(load_path.clone(), NodeKind::Directory, None);
        root_node.loaded = true;
        ctx.insert(root_node);
        ctx.mark_default_expanded(&load_path);

        if let Some(search_config) = &self.config.search {
            let search_request = SearchRequest {
                root: load_path.clone(),
                term: search_config.term.clone(),
                filters: search_config.filters.clone(),
                tool: search_config.tool,
                limit: search_config.limit,
            };
            search::run(
                &mut ctx,
                self.fs.as_ref(),
                self.search.as_ref(),
                &search_request,
            )
            .await;
        } else {
            if request.parent_id.is_none() {
                let resolved =
                    expand::resolve(&request.expanded, request.reveal.as_deref(), &load_path);
                ctx.queue = resolved.queue;
                for dir in &resolved.reveal_dirs {
                    ctx.mark_default_expanded(dir);
                }
            }
            let options = self.list_options(&request);
            scan::scan(&mut ctx, self.fs.as_ref(), &options, load_path).await;
        }

        sort::sort_tree(&mut ctx);
        self.emit(ctx, request.parent_id);
    }

    fn list_options(&self, request: &LoadRequest) -> ListOptions {
        ListOptions {
            show_hidden: self.config.show_hidden,
            respect_ignore: self.config.respect_gitignore,
            name_pattern: request.name_pattern.clone(),
            include_dirs: true,
        }
    }

    fn emit(&self, mut ctx: TreeContext, parent_id: Option<PathBuf>) {
        if ctx.epoch != self.epoch.load(Ordering::SeqCst) {
            tracing::debug!(
                "dropping completion from superseded load (epoch {})",
                ctx.epoch
            );
            return;
        }

        let update = match parent_id {
            Some(parent) => TreeUpdate::Children {
                nodes: ctx.children_of(&parent),
                parent,
            },
            None => {
                if let Some(hook) = &self.before_full_emit {
                    hook();
                }
                TreeUpdate::Full {
                    nodes: ctx.flatten(),
                    default_expanded: ctx.take_default_expanded(),
                }
            }
        };

        if self.sink.send(update).is_err() {
            tracing::debug!("presentation sink closed; dropping update");
        }
    }
}
