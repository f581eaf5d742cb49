//! Markup to Markdown conversion.
//!
//! The rewritten page is handed to an external converter as one
//! self-contained document. When the configured converter fails, callers
//! fall back to [`PlainTextConverter`] so the page is still exported.

mod pandoc;

pub use pandoc::PandocConverter;

use crate::error::ConversionError;
use crate::markup::parse_fragment;

/// The ability to turn a standard-markup document into Markdown.
pub trait Converter: Send + Sync {
    fn convert(&self, markup: &str) -> Result<String, ConversionError>;

    /// Short name for log lines.
    fn name(&self) -> &str;
}

/// Which converter the export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConverterKind {
    /// Pandoc, GitHub-flavored Markdown output
    #[default]
    Pandoc,
    /// Visible text only
    Plain,
}

impl ConverterKind {
    pub fn build(self, pandoc_program: &str) -> Box<dyn Converter> {
        match self {
            ConverterKind::Pandoc => Box::new(PandocConverter::new(pandoc_program)),
            ConverterKind::Plain => Box::new(PlainTextConverter),
        }
    }
}

/// Extracts the visible text, one paragraph per text run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl Converter for PlainTextConverter {
    fn convert(&self, markup: &str) -> Result<String, ConversionError> {
        let text = parse_fragment(markup).text_content("\n\n");
        if text.is_empty() {
            Ok(text)
        } else {
            Ok(format!("{}\n", text))
        }
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// Wraps a page body so it parses as a single tree.
pub fn wrap_document(markup: &str) -> String {
    format!("<div>\n{}\n</div>", markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_conversion() {
        let markup = wrap_document("<h1>Title</h1><p>One <a href=\"x.md\">link</a></p><p>Two &amp; three</p>");
        let text = PlainTextConverter.convert(&markup).unwrap();
        assert_eq!(text, "Title\n\nOne\n\nlink\n\nTwo & three\n");
    }

    #[test]
    fn test_plain_text_of_empty_document() {
        assert_eq!(PlainTextConverter.convert(&wrap_document("")).unwrap(), "");
    }

    #[test]
    fn test_converter_kind_builds_named_converter() {
        assert_eq!(ConverterKind::Plain.build("pandoc").name(), "plain");
        assert_eq!(ConverterKind::Pandoc.build("/opt/pandoc").name(), "/opt/pandoc");
    }
}
