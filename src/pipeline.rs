// src/pipeline.rs
//! Pipeline capability traits: the three stages every page goes through.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::error::AppError;
use crate::model::{Page, PageDetail};
use crate::output::{MaterializeOutcome, OutputReport, PathMap};
use std::path::PathBuf;

/// A page's detail plus what happened to its attachments.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub detail: PageDetail,
    pub attachments: Vec<MaterializeOutcome>,
}

/// A finished Markdown document ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Absolute destination of the document.
    pub path: PathBuf,
    pub content: String,
    /// The configured converter failed and plain text was used.
    pub degraded: bool,
}

/// Retrieves a page's content and materializes its attachments.
#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch(&self, page: &Page, paths: &PathMap) -> Result<FetchedPage, AppError>;
}

/// Turns fetched content into a Markdown document.
pub trait PageComposer {
    fn compose(
        &self,
        page: &Page,
        fetched: &FetchedPage,
        paths: &PathMap,
    ) -> Result<RenderedPage, AppError>;
}

/// Writes a rendered page to its destination.
pub trait PageDelivery {
    fn deliver(&self, page: RenderedPage) -> Result<OutputReport, AppError>;
}
