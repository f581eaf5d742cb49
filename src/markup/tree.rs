//! Owned markup tree and its serialization.

use quick_xml::escape::{escape, unescape_with};
use std::borrow::Cow;

/// A parsed fragment: a sequence of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text exactly as it appeared in the source, entities still escaped.
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attribute values are stored unescaped.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Written as `<name/>` when it has no children.
    pub self_closing: bool,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_markup(&mut out);
        }
        out
    }

    /// Visible text of the fragment, non-blank runs joined by `separator`.
    pub fn text_content(&self, separator: &str) -> String {
        let mut segments = Vec::new();
        for node in &self.nodes {
            node.collect_text(&mut segments);
        }
        join_segments(segments, separator)
    }
}

impl Node {
    /// Creates a text node from unescaped text.
    pub fn text(text: &str) -> Self {
        Node::Text(escape(text).into_owned())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_markup(out),
            Node::Text(raw) => out.push_str(raw),
            Node::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }

    fn collect_text(&self, segments: &mut Vec<String>) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(segments);
                }
            }
            Node::Text(raw) => segments.push(unescape_text(raw).into_owned()),
            Node::CData(data) => segments.push(data.clone()),
            Node::Comment(_) => {}
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Standard (X)HTML elements have no namespace prefix.
    pub fn is_standard(&self) -> bool {
        !self.name.contains(':')
    }

    /// First descendant element with the given name, depth first.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Node::Element(element) if element.name == name => Some(element),
            Node::Element(element) => element.find_descendant(name),
            _ => None,
        })
    }

    /// Visible text of the element, non-blank runs joined by `separator`.
    pub fn text_content(&self, separator: &str) -> String {
        let mut segments = Vec::new();
        for child in &self.children {
            child.collect_text(&mut segments);
        }
        join_segments(segments, separator)
    }

    /// All text below the element, concatenated as-is.
    pub fn raw_text(&self) -> String {
        let mut segments = Vec::new();
        for child in &self.children {
            child.collect_text(&mut segments);
        }
        segments.concat()
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.self_closing && self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn join_segments(segments: Vec<String>, separator: &str) -> String {
    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Unescapes XML and the HTML entities Confluence emits, keeping the raw
/// text when an unknown entity is found.
pub(crate) fn unescape_text(raw: &str) -> Cow<'_, str> {
    unescape_with(raw, html_entity).unwrap_or(Cow::Borrowed(raw))
}

fn html_entity(name: &str) -> Option<&'static str> {
    let resolved = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "euro" => "\u{20ac}",
        "times" => "\u{d7}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        _ => return None,
    };
    Some(resolved)
}
