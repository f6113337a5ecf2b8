pub mod cli;
pub mod merge;

pub use cli::{run_propmerge, MergeExit};
pub use merge::{load_props, merge, merge_files};
