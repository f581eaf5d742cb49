//! The closed set of reference shapes found in storage markup, and how each
//! one is resolved against the page path map.

use super::RewriteContext;
use crate::markup::{Element, Node};
use crate::output::paths::sanitize_name;
use crate::output::LinkTarget;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::path::Path;

static PAGE_ID_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"pageId=(\d+)").expect("Failed to compile page id regex - this is a bug in the code")
});

static ATTACHMENT_DOWNLOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/download/attachments/[^/]+/([^/?#]+)")
        .expect("Failed to compile attachment download regex - this is a bug in the code")
});

/// How a page link names its target page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Id(String),
    Title(String),
}

impl PageTarget {
    fn as_link_target(&self) -> LinkTarget<'_> {
        match self {
            PageTarget::Id(id) => LinkTarget::Id(id),
            PageTarget::Title(title) => LinkTarget::Title(title),
        }
    }
}

/// A pointer discovered in a page's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `<ac:image>` wrapping `<ri:attachment ri:filename=..>` or `<ri:url ri:value=..>`.
    AttachmentEmbed {
        filename: Option<String>,
        url: Option<String>,
        alt: Option<String>,
    },
    /// `<ac:link>` wrapping `<ri:page>`.
    PageLink {
        target: Option<PageTarget>,
        text: String,
    },
    /// `<a href=..>`
    Href(String),
    /// `<img src=..>`
    Src(String),
}

/// What replaces the element a reference was found on.
#[derive(Debug)]
pub enum Resolution {
    /// Final replacement nodes; not visited again.
    Replace(Vec<Node>),
    /// The (possibly updated) element; its children still get rewritten.
    Keep(Element),
}

impl Reference {
    /// Recognizes the reference carried by `element`, if any.
    pub fn classify(element: &Element) -> Option<Self> {
        match element.name.as_str() {
            "ac:image" => {
                let filename = element
                    .find_descendant("ri:attachment")
                    .and_then(|ri| ri.attribute("ri:filename"))
                    .filter(|name| !name.trim().is_empty())
                    .map(str::to_string);
                let url = element
                    .find_descendant("ri:url")
                    .and_then(|ri| ri.attribute("ri:value"))
                    .filter(|url| !url.trim().is_empty())
                    .map(str::to_string);

                if filename.is_none() && url.is_none() {
                    return None;
                }

                Some(Reference::AttachmentEmbed {
                    filename,
                    url,
                    alt: element.attribute("ac:alt").map(str::to_string),
                })
            }
            "ac:link" => {
                let page = element.find_descendant("ri:page")?;
                let target = non_empty(page.attribute("ri:page-id"))
                    .map(PageTarget::Id)
                    .or_else(|| non_empty(page.attribute("ri:content-title")).map(PageTarget::Title));

                Some(Reference::PageLink {
                    target,
                    text: element.raw_text(),
                })
            }
            "a" => element.attribute("href").map(|href| Reference::Href(href.to_string())),
            "img" => element.attribute("src").map(|src| Reference::Src(src.to_string())),
            _ => None,
        }
    }

    /// Rewrites the reference relative to the owner page. Never fails:
    /// unresolvable targets degrade to text or are left untouched.
    pub fn resolve(self, mut element: Element, ctx: &RewriteContext<'_>) -> Resolution {
        match self {
            Reference::AttachmentEmbed { filename, url, alt } => {
                let src = filename
                    .map(|name| sanitize_name(&name))
                    .filter(|name| !name.is_empty())
                    .map(|name| ctx.attachment_link(&name))
                    .or(url);

                let Some(src) = src else {
                    return Resolution::Replace(Vec::new());
                };

                let mut image = Element::new("img").with_attribute("src", src).self_closing();
                if let Some(alt) = alt {
                    image.set_attribute("alt", alt);
                }
                Resolution::Replace(vec![Node::Element(image)])
            }
            Reference::PageLink { target, text } => {
                let resolved = target
                    .as_ref()
                    .and_then(|target| ctx.paths.lookup(target.as_link_target()));

                match resolved {
                    Some((_, target_path)) => {
                        let href = ctx.paths.link_from(ctx.owner, target_path);
                        let label = if text.trim().is_empty() {
                            file_stem(target_path)
                        } else {
                            text
                        };
                        let link = Element::new("a")
                            .with_attribute("href", href)
                            .with_child(Node::text(&label));
                        Resolution::Replace(vec![Node::Element(link)])
                    }
                    None => {
                        log::debug!(
                            "Page {} links to unknown page {:?}; keeping text only",
                            ctx.owner,
                            target
                        );
                        if text.is_empty() {
                            Resolution::Replace(Vec::new())
                        } else {
                            Resolution::Replace(vec![Node::text(&text)])
                        }
                    }
                }
            }
            Reference::Href(href) => {
                if let Some(rewritten) = rewrite_target(&href, ctx) {
                    element.set_attribute("href", rewritten);
                }
                Resolution::Keep(element)
            }
            Reference::Src(src) => {
                if let Some(name) = attachment_download_name(&src) {
                    element.set_attribute("src", ctx.attachment_link(&name));
                }
                Resolution::Keep(element)
            }
        }
    }
}

/// New href for a generic link: attachment downloads first, then `pageId=`
/// links to pages in the map. `None` leaves the href untouched.
fn rewrite_target(href: &str, ctx: &RewriteContext<'_>) -> Option<String> {
    if let Some(name) = attachment_download_name(href) {
        return Some(ctx.attachment_link(&name));
    }

    let page_id = PAGE_ID_PARAM.captures(href)?.get(1)?.as_str();
    let (_, target_path) = ctx.paths.lookup(LinkTarget::Id(page_id))?;
    Some(ctx.paths.link_from(ctx.owner, target_path))
}

/// Sanitized file name of an attachment download URL, if `url` is one.
fn attachment_download_name(url: &str) -> Option<String> {
    let encoded = ATTACHMENT_DOWNLOAD.captures(url)?.get(1)?.as_str();
    let decoded = percent_decode_str(encoded).decode_utf8_lossy();
    let name = sanitize_name(&decoded);
    (!name.is_empty()).then_some(name)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use pretty_assertions::assert_eq;

    fn first_element(markup: &str) -> Element {
        match parse_fragment(markup).nodes.into_iter().next() {
            Some(Node::Element(element)) => element,
            other => panic!("expected an element, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_attachment_embed() {
        let element = first_element(
            "<ac:image ac:alt=\"Flow\"><ri:attachment ri:filename=\"flow.png\"/></ac:image>",
        );
        assert_eq!(
            Reference::classify(&element),
            Some(Reference::AttachmentEmbed {
                filename: Some("flow.png".to_string()),
                url: None,
                alt: Some("Flow".to_string()),
            })
        );
    }

    #[test]
    fn test_classify_external_image() {
        let element =
            first_element("<ac:image><ri:url ri:value=\"https://cdn.local/x.png\"/></ac:image>");
        assert_eq!(
            Reference::classify(&element),
            Some(Reference::AttachmentEmbed {
                filename: None,
                url: Some("https://cdn.local/x.png".to_string()),
                alt: None,
            })
        );
    }

    #[test]
    fn test_classify_page_link_prefers_id() {
        let element = first_element(
            "<ac:link><ri:page ri:page-id=\"42\" ri:content-title=\"Home\"/>\
             <ac:link-body>Go</ac:link-body></ac:link>",
        );
        assert_eq!(
            Reference::classify(&element),
            Some(Reference::PageLink {
                target: Some(PageTarget::Id("42".to_string())),
                text: "Go".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_ignores_other_elements() {
        assert_eq!(Reference::classify(&first_element("<p>x</p>")), None);
        assert_eq!(Reference::classify(&first_element("<a name=\"anchor\">x</a>")), None);
        assert_eq!(
            Reference::classify(&first_element("<ac:link><ri:user ri:account-id=\"u\"/></ac:link>")),
            None
        );
        assert_eq!(Reference::classify(&first_element("<ac:image></ac:image>")), None);
    }

    #[test]
    fn test_attachment_download_name() {
        assert_eq!(
            attachment_download_name("/wiki/download/attachments/123/my%20file.pdf?version=2"),
            Some("my file.pdf".to_string())
        );
        assert_eq!(
            attachment_download_name("https://x/download/attachments/9/a%3Ab.png#frag"),
            Some("a_b.png".to_string())
        );
        assert_eq!(attachment_download_name("https://x/download/other/9/a.png"), None);
    }
}
