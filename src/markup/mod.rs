//! Storage-format markup as a tree.
//!
//! Confluence stores page bodies as XHTML fragments mixed with its own
//! namespaced elements (`ac:link`, `ri:attachment`, ...). This module parses
//! such a fragment into an owned tree, tolerating the malformed input real
//! pages contain, and writes it back out.

mod parser;
mod tree;

pub use parser::parse_fragment;
pub use tree::{Element, Fragment, Node};
