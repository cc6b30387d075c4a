// In-memory explorer tree: the per-invocation context and node arena,
// the drivers that populate it (scan and search), and the loader that
// orchestrates them.

pub mod build;
pub mod context;
pub mod expand;
pub mod loader;
pub mod node;
pub mod scan;
pub mod search;
pub mod sort;

pub use context::TreeContext;
pub use loader::{LoadRequest, TreeLoader, TreeUpdate};
pub use node::{NodeKind, TreeNode};
