// Async directory-tree model for file explorer UIs.
//
// `fs` defines the filesystem and search collaborators, `tree` the
// per-invocation tree model and the drivers that populate it, `config`
// the serializable configuration surface.

pub mod config;
pub mod fs;
pub mod tree;
