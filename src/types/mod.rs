mod change;
mod commit;
mod entry;
mod tree;

pub use change::{ChangeKind, DiffEntry};
pub use commit::{Commit, CommitDraft, SealedCommit};
pub use entry::Entry;
pub use tree::Tree;
