// src/api/mod.rs
//! Confluence API interaction: the ability to read a space.
//!
//! Business logic depends on [`ConfluenceRepository`], never on HTTP
//! details, so the export can run against any source of pages.

pub mod client;
pub mod parser;
mod responses;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::model::{Attachment, Page, PageDetail};
use crate::types::{PageId, SpaceKey};

/// The ability to retrieve content from a Confluence space.
#[async_trait::async_trait]
pub trait ConfluenceRepository: Send + Sync {
    /// Every page of the space, with its ancestor chain.
    async fn list_pages(&self, space: &SpaceKey) -> Result<Vec<Page>, AppError>;

    /// A page's storage-format body and metadata.
    async fn retrieve_page(&self, id: &PageId) -> Result<PageDetail, AppError>;

    /// Attachments of one page. Implementations may return a partial list
    /// rather than fail.
    async fn list_attachments(&self, page: &PageId) -> Result<Vec<Attachment>, AppError>;

    /// Streams an attachment's bytes into `sink`, returning how many were written.
    async fn download_attachment(
        &self,
        attachment: &Attachment,
        sink: &mut (dyn std::io::Write + Send),
    ) -> Result<u64, AppError>;
}

pub use client::ConfluenceHttpClient;
