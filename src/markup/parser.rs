//! Tolerant fragment parser built on quick-xml events.
//!
//! Page bodies are fragments (many roots), use HTML entities XML doesn't
//! define, and now and then carry unbalanced tags. None of this may fail a
//! page: unbalanced end tags are ignored, unclosed elements are closed at
//! the end of input, and byte ranges the reader rejects are kept verbatim.

use super::tree::{unescape_text, Element, Fragment, Node};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// HTML elements that never have content, even when written as `<br>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parses a storage-format fragment. Never fails.
pub fn parse_fragment(markup: &str) -> Fragment {
    let mut reader = reader_for(markup);
    let mut builder = TreeBuilder::default();
    // Absolute offsets into `markup`; `base` is where the current reader starts.
    let mut base = 0usize;
    let mut consumed = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) | Ok(Event::Empty(start))
                if !is_valid_name(start.name().as_ref()) =>
            {
                // A stray `<` in text: keep it as text and resume right after it.
                log::debug!("Treating '<' at byte {} as text", consumed);
                builder.append_text("&lt;");
                base = consumed + 1;
                consumed = base;
                reader = reader_for(markup.get(base..).unwrap_or_default());
                continue;
            }
            Ok(Event::Start(start)) => {
                let element = element_from(&start);
                if is_void(&element.name) {
                    builder.append(Node::Element(element.self_closing()));
                } else {
                    builder.open(element);
                }
            }
            Ok(Event::Empty(start)) => {
                builder.append(Node::Element(element_from(&start).self_closing()));
            }
            Ok(Event::End(end)) => {
                builder.close(&String::from_utf8_lossy(end.name().as_ref()));
            }
            Ok(Event::Text(text)) => {
                builder.append_text(&String::from_utf8_lossy(&text));
            }
            Ok(Event::GeneralRef(reference)) => {
                builder.append_text(&format!("&{};", String::from_utf8_lossy(&reference)));
            }
            Ok(Event::CData(data)) => {
                builder.append(Node::CData(String::from_utf8_lossy(&data).into_owned()));
            }
            Ok(Event::Comment(comment)) => {
                builder.append(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                let position = base + reader.buffer_position() as usize;
                log::debug!("Malformed markup near byte {}: {}", position, err);

                match markup.get(consumed..position).filter(|_| position > consumed) {
                    Some(unparsed) => {
                        builder.append_text(&unparsed.replace('<', "&lt;"));
                        consumed = position;
                        continue;
                    }
                    None => {
                        let rest = markup.get(consumed..).unwrap_or_default();
                        builder.append_text(&rest.replace('<', "&lt;"));
                        break;
                    }
                }
            }
        }
        consumed = base + reader.buffer_position() as usize;
    }

    builder.finish()
}

fn reader_for(markup: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.expand_empty_elements = false;
    reader
}

/// Tag names as they appear in storage markup: `p`, `h1`, `ac:link`.
fn is_valid_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

fn element_from(start: &BytesStart<'_>) -> Element {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attribute in start.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape_text(&raw).into_owned();
        element.attributes.push((key, value));
    }

    element
}

/// Stack of open elements; finished nodes are appended to the innermost one.
#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };

        match siblings.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => siblings.push(Node::Text(text.to_string())),
        }
    }

    /// Closes the innermost open element with this name, implicitly closing
    /// everything opened after it. Unmatched end tags are dropped.
    fn close(&mut self, name: &str) {
        let Some(index) = self.open.iter().rposition(|element| element.name == name) else {
            log::debug!("Ignoring unmatched end tag </{}>", name);
            return;
        };

        while self.open.len() > index {
            if let Some(element) = self.open.pop() {
                self.append(Node::Element(element));
            }
        }
    }

    fn finish(mut self) -> Fragment {
        while let Some(element) = self.open.pop() {
            self.append(Node::Element(element));
        }
        Fragment::new(self.roots)
    }
}
