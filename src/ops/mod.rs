//! high-level operations on quill repositories

mod add;
mod build_tree;
mod commit;
mod diff;
mod log;
mod ls_tree;
mod status;

pub use add::add;
pub use build_tree::build_tree;
pub use commit::{commit, create_commit};
pub use diff::{diff, diff_commits, diff_paths};
pub use log::{log, LogEntry};
pub use ls_tree::{ls_tree, LsTreeEntry};
pub use status::{status, Status};
