//! Filesystem side of the pipeline: path expansion and the `Collaborators`
//! implementation backed by real files.

mod fs;
mod path;

pub use fs::FsIo;
pub use path::expand_path;
