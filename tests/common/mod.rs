// tests/common/mod.rs
//! Shared fixtures: an in-memory space and simple converters.

#![allow(dead_code)]

use confluence2md::{
    Ancestor, AppError, Attachment, AttachmentId, ConfluenceErrorCode, ConfluenceRepository,
    ConversionError, Converter, Page, PageDetail, PageId, SpaceKey,
};
use std::collections::{HashMap, HashSet};
use std::io::Write;

fn not_found(what: String) -> AppError {
    AppError::ConfluenceService {
        code: ConfluenceErrorCode::NotFound,
        message: what,
        status: reqwest::StatusCode::NOT_FOUND,
    }
}

/// A space held in memory, keyed by page id.
#[derive(Default)]
pub struct InMemorySpace {
    pages: Vec<Page>,
    details: HashMap<String, PageDetail>,
    attachments: HashMap<String, Vec<Attachment>>,
    downloads: HashMap<String, Vec<u8>>,
    broken_attachment_listings: HashSet<String>,
    listing_fails: bool,
}

impl InMemorySpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page; `ancestors` are `(id, title)` pairs, root first.
    pub fn page(mut self, id: &str, title: &str, ancestors: &[(&str, &str)], body: &str) -> Self {
        let page_id = PageId::parse(id).unwrap();
        let ancestors = ancestors
            .iter()
            .map(|(id, title)| Ancestor {
                id: Some(PageId::parse(id).unwrap()),
                title: Some(title.to_string()),
            })
            .collect();

        self.pages.push(Page::new(page_id.clone(), title, ancestors));
        self.details.insert(
            id.to_string(),
            PageDetail {
                id: page_id,
                title: Some(title.to_string()),
                body: body.to_string(),
                labels: vec!["exported".to_string()],
                version: Some(1),
                updated: None,
            },
        );
        self
    }

    /// Listed page whose detail cannot be retrieved.
    pub fn unavailable_page(mut self, id: &str, title: &str) -> Self {
        self.pages
            .push(Page::new(PageId::parse(id).unwrap(), title, Vec::new()));
        self
    }

    pub fn attachment(mut self, page_id: &str, id: &str, title: &str, body: &[u8]) -> Self {
        let link = format!("/download/attachments/{}/{}", page_id, id);
        self.downloads.insert(link.clone(), body.to_vec());
        self.attachments
            .entry(page_id.to_string())
            .or_default()
            .push(Attachment {
                id: AttachmentId::parse(id).unwrap(),
                title: Some(title.to_string()),
                download: Some(link),
            });
        self
    }

    /// Listed attachment whose download fails.
    pub fn missing_attachment(mut self, page_id: &str, id: &str, title: &str) -> Self {
        self.attachments
            .entry(page_id.to_string())
            .or_default()
            .push(Attachment {
                id: AttachmentId::parse(id).unwrap(),
                title: Some(title.to_string()),
                download: Some(format!("/download/attachments/{}/gone", page_id)),
            });
        self
    }

    pub fn break_attachment_listing(mut self, page_id: &str) -> Self {
        self.broken_attachment_listings.insert(page_id.to_string());
        self
    }

    pub fn fail_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }
}

#[async_trait::async_trait]
impl ConfluenceRepository for InMemorySpace {
    async fn list_pages(&self, space: &SpaceKey) -> Result<Vec<Page>, AppError> {
        if self.listing_fails {
            return Err(not_found(format!("No space with key : {}", space)));
        }
        Ok(self.pages.clone())
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<PageDetail, AppError> {
        self.details
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found(format!("No content found with id: {}", id)))
    }

    async fn list_attachments(&self, page: &PageId) -> Result<Vec<Attachment>, AppError> {
        if self.broken_attachment_listings.contains(page.as_str()) {
            return Err(AppError::MalformedResponse("truncated body".to_string()));
        }
        Ok(self.attachments.get(page.as_str()).cloned().unwrap_or_default())
    }

    async fn download_attachment(
        &self,
        attachment: &Attachment,
        sink: &mut (dyn Write + Send),
    ) -> Result<u64, AppError> {
        let link = attachment.download.clone().unwrap_or_default();
        let body = self
            .downloads
            .get(&link)
            .ok_or_else(|| not_found(link.clone()))?;
        sink.write_all(body)?;
        Ok(body.len() as u64)
    }
}

/// Returns the markup unchanged, so tests can inspect rewritten links.
pub struct PassthroughConverter;

impl Converter for PassthroughConverter {
    fn convert(&self, markup: &str) -> Result<String, ConversionError> {
        Ok(markup.to_string())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

/// Always fails, forcing the plain-text fallback.
pub struct BrokenConverter;

impl Converter for BrokenConverter {
    fn convert(&self, _markup: &str) -> Result<String, ConversionError> {
        Err(ConversionError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "unknown reader".to_string(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}

pub fn space_key() -> SpaceKey {
    SpaceKey::new("DOCS").unwrap()
}
