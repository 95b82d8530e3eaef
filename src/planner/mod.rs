//! Split planning, chunk layout and size-bounded grouping
//!
//! Everything here is pure: no I/O, no external tools.

pub mod grouping;
pub mod layout;
pub mod split;

pub use grouping::group_by_size;
pub use layout::{chunk_windows, ChunkWindow};
pub use split::SplitPlanner;
