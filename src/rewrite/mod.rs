//! Reference rewriting for one page's storage markup.
//!
//! The markup is parsed into a tree and visited once. Each element carrying
//! a [`Reference`] is resolved against the shared [`PathMap`]; every other
//! namespaced (`ac:`/`ri:`) element is flattened afterwards, so the result
//! only contains standard elements when it reaches the converter.

mod references;

pub use references::{PageTarget, Reference, Resolution};

use crate::markup::{parse_fragment, Element, Fragment, Node};
use crate::output::PathMap;
use crate::types::PageId;

/// Read-only inputs shared by every reference on a page.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    pub owner: &'a PageId,
    pub paths: &'a PathMap,
    /// Attachment directory relative to the owner's directory, e.g. `_attachments/2`.
    pub attachment_dir: &'a str,
}

impl RewriteContext<'_> {
    /// Link to an already sanitized attachment name.
    pub fn attachment_link(&self, name: &str) -> String {
        let dir = self.attachment_dir.trim_end_matches('/');
        if dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", dir, name)
        }
    }
}

/// Rewrites every reference in `markup` relative to the owner page's output
/// location and strips non-standard elements. Never fails.
pub fn rewrite(markup: &str, owner: &PageId, paths: &PathMap, attachment_dir: &str) -> String {
    let ctx = RewriteContext {
        owner,
        paths,
        attachment_dir,
    };

    let fragment = parse_fragment(markup);
    Fragment::new(rewrite_nodes(fragment.nodes, &ctx)).to_markup()
}

fn rewrite_nodes(nodes: Vec<Node>, ctx: &RewriteContext<'_>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| rewrite_node(node, ctx))
        .collect()
}

fn rewrite_node(node: Node, ctx: &RewriteContext<'_>) -> Vec<Node> {
    let Node::Element(element) = node else {
        return vec![node];
    };

    let mut element = match Reference::classify(&element) {
        Some(reference) => match reference.resolve(element, ctx) {
            Resolution::Replace(nodes) => return nodes,
            Resolution::Keep(element) => element,
        },
        None => element,
    };

    element.children = rewrite_nodes(std::mem::take(&mut element.children), ctx);

    if element.is_standard() {
        vec![Node::Element(element)]
    } else {
        flatten(element)
    }
}

/// Replaces a non-standard element by what it shows.
///
/// Its children were already rewritten, so any element among them is
/// standard: if there are some, the element is unwrapped into its children.
/// Otherwise it becomes its text, or nothing when it has none.
fn flatten(element: Element) -> Vec<Node> {
    if element.children.iter().any(Node::is_element) {
        return element.children;
    }

    let text = element.text_content(" ");
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(&text)]
    }
}
