pub mod blob;
pub mod commit;
pub mod store;
pub mod tree;

pub use blob::{read_blob, write_blob};
pub use commit::{read_commit, write_commit};
pub use store::{exists as object_exists, get as read_object, object_path, put as write_object};
pub use tree::{list_tree_paths, read_tree, write_tree};
