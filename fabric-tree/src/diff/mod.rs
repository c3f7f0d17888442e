//! Structural tree diffing.

pub mod engine;
pub mod result;

pub use engine::diff;
pub use result::DiffEntry;
