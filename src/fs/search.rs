//! External search collaborator interface.
//!
//! A search backend turns one request into a serialized stream of match
//! events; the stream closing is the completion signal. The default
//! implementation shells out to an `fd`/`rg` style tool and streams its
//! stdout, or walks the subtree in process when no external tool is
//! selected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// External tool used to produce search matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTool {
    /// `fd` name search.
    Fd,
    /// `rg --files` filtered by a name glob.
    Ripgrep,
    /// In-process walk, no external binary required.
    #[default]
    Builtin,
}

/// One search invocation handed to a [`SearchBackend`].
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Subtree to search under.
    pub root: PathBuf,
    /// Name fragment to match.
    pub term: String,
    /// Extra arguments passed through to the external tool verbatim.
    pub filters: Vec<String>,
    /// Which tool produces the matches.
    pub tool: SearchTool,
    /// Maximum number of matches to report; 0 means unlimited.
    pub limit: usize,
}

/// A single event on a search stream.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A matching path. Reported without a type; consumers classify it
    /// themselves.
    Match(PathBuf),
    /// A non-fatal collaborator error; the stream continues.
    Error(String),
}

/// Async search collaborator trait.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Start a search and return its event stream.
    ///
    /// Events arrive in collaborator order; the channel closing is the
    /// one and only completion signal. Implementations must not fail the
    /// call itself; launch problems surface as [`SearchEvent::Error`].
    async fn search(&self, request: &SearchRequest) -> mpsc::UnboundedReceiver<SearchEvent>;
}

/// Default search collaborator.
///
/// [`SearchTool::Fd`] and [`SearchTool::Ripgrep`] spawn the external tool
/// and stream its stdout line by line; [`SearchTool::Builtin`] walks the
/// subtree on a blocking worker with gitignore-aware traversal.
#[derive(Debug, Default)]
pub struct DefaultSearchBackend;

impl DefaultSearchBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchBackend for DefaultSearchBackend {
    async fn search(&self, request: &SearchRequest) -> mpsc::UnboundedReceiver<SearchEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let request = request.clone();

        match request.tool {
            SearchTool::Builtin => {
                tokio::task::spawn_blocking(move || walk_search(&request, &tx));
            }
            SearchTool::Fd | SearchTool::Ripgrep => {
                tokio::spawn(async move {
                    stream_command(command_for(&request), request.limit, tx).await;
                });
            }
        }

        rx
    }
}

fn command_for(request: &SearchRequest) -> Command {
    let mut command = match request.tool {
        SearchTool::Fd => {
            let mut c = Command::new("fd");
            c.arg("--absolute-path");
            c.arg("--");
            c.arg(&request.term);
            c.arg(&request.root);
            c
        }
        _ => {
            let mut c = Command::new("rg");
            c.arg("--files");
            c.arg("--glob");
            c.arg(format!("*{}*", request.term));
            c.arg(&request.root);
            c
        }
    };
    for filter in &request.filters {
        command.arg(filter);
    }
    command
}

/// Spawn the external tool and forward stdout lines as match events.
async fn stream_command(mut command: Command, limit: usize, tx: mpsc::UnboundedSender<SearchEvent>) {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(SearchEvent::Error(format!(
                "failed to launch search tool: {e}"
            )));
            return;
        }
    };

    let Some(stdout) = child.stdout.take() else {
        let _ = tx.send(SearchEvent::Error("search tool has no stdout".to_string()));
        return;
    };

    let mut lines = BufReader::new(stdout).lines();
    let mut sent = 0usize;
    while let Ok(Some(line)) = lines.next_line().await {
        if line.is_empty() {
            continue;
        }
        if tx.send(SearchEvent::Match(PathBuf::from(line))).is_err() {
            break;
        }
        sent += 1;
        if limit != 0 && sent >= limit {
            break;
        }
    }

    // Stop a tool that is still producing output past the limit (or past
    // the receiver's interest).
    if let Err(e) = child.kill().await {
        tracing::trace!("search tool already exited: {}", e);
    }
    match child.wait().await {
        Ok(status) if !status.success() => {
            tracing::debug!("search tool exited with {}", status);
        }
        Ok(_) => {}
        Err(e) => {
            let _ = tx.send(SearchEvent::Error(e.to_string()));
        }
    }
}

/// In-process fallback: gitignore-aware walk matching names by substring.
fn walk_search(request: &SearchRequest, tx: &mpsc::UnboundedSender<SearchEvent>) {
    let term = request.term.to_lowercase();
    let mut sent = 0usize;

    // Apply .gitignore rules whether or not the root is a git repository.
    let walker = ignore::WalkBuilder::new(&request.root)
        .require_git(false)
        .build();

    for entry in walker {
        if request.limit != 0 && sent >= request.limit {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if tx.send(SearchEvent::Error(e.to_string())).is_err() {
                    return;
                }
                continue;
            }
        };
        // Depth 0 is the search root itself.
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.contains(&term) {
            if tx.send(SearchEvent::Match(entry.into_path())).is_err() {
                return;
            }
            sent += 1;
        }
    }
}
