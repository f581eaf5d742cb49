//! Domain model of an exported space.
//!
//! These records are produced by the fetch collaborator and are read-only
//! afterwards: the resolver and rewriter borrow them, nothing mutates them.

use crate::types::{AttachmentId, PageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the ancestor chain, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestor {
    pub id: Option<PageId>,
    pub title: Option<String>,
}

impl Ancestor {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
        }
    }
}

/// A page as returned by the space listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: Option<String>,
    /// Root-to-parent chain; empty for top-level pages.
    pub ancestors: Vec<Ancestor>,
}

impl Page {
    pub fn new(id: PageId, title: impl Into<String>, ancestors: Vec<Ancestor>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            ancestors,
        }
    }

    /// Title for log lines and front matter.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled",
        }
    }
}

/// Full detail of one page: storage-format body plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDetail {
    pub id: PageId,
    pub title: Option<String>,
    /// Raw storage-format markup (XHTML with `ac:`/`ri:` elements).
    pub body: String,
    pub labels: Vec<String>,
    pub version: Option<u64>,
    pub updated: Option<DateTime<Utc>>,
}

/// A file attached to exactly one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub title: Option<String>,
    /// Site-relative or absolute download link.
    pub download: Option<String>,
}

impl Attachment {
    /// The name the attachment should be stored under, before sanitizing.
    ///
    /// Prefers the title and falls back to the last component of the
    /// download link (without its query string).
    pub fn file_name(&self) -> Option<String> {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(title.to_string());
        }

        let download = self.download.as_deref()?;
        let path = download.split(['?', '#']).next().unwrap_or(download);
        path.rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(title: Option<&str>, download: Option<&str>) -> Attachment {
        Attachment {
            id: AttachmentId::parse("att1").unwrap(),
            title: title.map(str::to_string),
            download: download.map(str::to_string),
        }
    }

    #[test]
    fn test_attachment_file_name_prefers_title() {
        let att = attachment(Some("diagram.png"), Some("/download/attachments/2/other.png"));
        assert_eq!(att.file_name().as_deref(), Some("diagram.png"));
    }

    #[test]
    fn test_attachment_file_name_from_download_link() {
        let att = attachment(None, Some("/download/attachments/2/report.pdf?version=1&api=v2"));
        assert_eq!(att.file_name().as_deref(), Some("report.pdf"));

        let att = attachment(Some("  "), None);
        assert_eq!(att.file_name(), None);
    }

    #[test]
    fn test_display_title_fallback() {
        let page = Page {
            id: PageId::parse("1").unwrap(),
            title: None,
            ancestors: vec![],
        };
        assert_eq!(page.display_title(), "Untitled");
    }
}
