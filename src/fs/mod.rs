pub mod path;
pub mod write;

pub use path::{clean_path, reject_symlinked_parents, resolve_in_repo};
pub use write::{fsync_dir, write_atomic};
