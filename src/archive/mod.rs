//! Zip packing and unpacking of the local mirror.
//!
//! Packing walks a directory and writes every regular file into a
//! deflate-compressed zip archive under its `/`-joined relative path.
//! Unpacking re-expands an archive into a destination directory and
//! rejects any entry whose path would resolve outside of it.

mod error;
mod pack;
mod unpack;

pub use error::ArchiveError;
pub use pack::pack;
pub use unpack::unpack;
