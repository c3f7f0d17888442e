//! Generic document-tree primitives used by higher-level tools.
//!
//! A parsed YAML or JSON document becomes a [`Node`] tree. Locations in the
//! tree are described by [`Path`] values, classified with [`classify`] and
//! mutated through [`Node::set_path`] / [`Node::remove_path`]. Two trees can be
//! compared with [`diff`].

pub mod diff;
pub mod format;
pub mod node;
pub mod parser;
pub mod path;
pub mod writer;

pub use diff::{diff, DiffEntry};
pub use format::{format_summary, format_text, DocumentFormat};
pub use node::{Node, NodeKind};
pub use parser::{parse, parse_file, parse_json, ParseError};
pub use path::{classify, Classification, KeyState, Path, PathError, Segment};
pub use writer::{write, write_file, WriteError};
