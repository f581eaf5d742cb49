// src/export.rs
//! Whole-space export: list, resolve paths, then fetch, rewrite, convert
//! and write each page in turn.
//!
//! The path map is built once from the complete listing before any page is
//! processed and only read afterwards. Pages are processed sequentially;
//! a failing page is logged and skipped without affecting the others.

use crate::analytics::ExportSummary;
use crate::api::ConfluenceRepository;
use crate::constants::ATTACHMENTS_DIR_NAME;
use crate::convert::{wrap_document, Converter, PlainTextConverter};
use crate::error::AppError;
use crate::model::Page;
use crate::output::{
    attachment_dir_name, deliver, materialize, DeliveryTarget, FrontMatter, OutputPlan,
    OutputReport, PathMap,
};
use crate::pipeline::{FetchedPage, PageComposer, PageDelivery, PageSource, RenderedPage};
use crate::rewrite::rewrite;
use crate::types::SpaceKey;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Exports every page of a space into a directory tree of Markdown files.
pub struct SpaceExporter<'a> {
    repo: &'a dyn ConfluenceRepository,
    converter: &'a dyn Converter,
    output_root: PathBuf,
    request_delay: Duration,
}

impl<'a> SpaceExporter<'a> {
    pub fn new(
        repo: &'a dyn ConfluenceRepository,
        converter: &'a dyn Converter,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repo,
            converter,
            output_root: output_root.into(),
            request_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive pages.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Runs the export. Only a failing space listing (or an unusable output
    /// root) is an error; page failures are counted in the summary.
    pub async fn run(&self, space: &SpaceKey) -> Result<ExportSummary, AppError> {
        log::info!("Listing pages of space {}", space);
        let mut pages = self.repo.list_pages(space).await?;

        // Listing order is not stable across runs; sorting keeps
        // collision suffixes deterministic.
        pages.sort_by(|a, b| a.id.cmp(&b.id));
        let listed = pages.len();
        pages.dedup_by(|a, b| a.id == b.id);
        if pages.len() < listed {
            log::warn!("Ignoring {} duplicate listing entries", listed - pages.len());
        }

        let paths = PathMap::resolve(&pages);
        self.prepare_output_root()?;

        let mut summary = ExportSummary {
            pages_listed: pages.len(),
            ..ExportSummary::default()
        };
        let total = pages.len();

        for (index, page) in pages.iter().enumerate() {
            log::info!(
                "[{}/{}] Processing: {} ({})",
                index + 1,
                total,
                page.display_title(),
                page.id
            );

            match self.export_page(page, &paths, &mut summary).await {
                Ok(()) => summary.pages_exported += 1,
                Err(e) => {
                    log::error!(
                        "Error processing page {} ({}): {}",
                        page.id,
                        page.display_title(),
                        e
                    );
                    summary.record_failure(&page.id, &e);
                }
            }

            if index + 1 < total && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        summary.log();
        Ok(summary)
    }

    async fn export_page(
        &self,
        page: &Page,
        paths: &PathMap,
        summary: &mut ExportSummary,
    ) -> Result<(), AppError> {
        let fetched = self.fetch(page, paths).await?;
        for outcome in &fetched.attachments {
            summary.record_attachment(outcome);
        }

        let rendered = self.compose(page, &fetched, paths)?;
        if rendered.degraded {
            summary.degraded_conversions += 1;
        }

        summary.bytes_written += ensure_delivered(self.deliver(rendered)?)?;
        Ok(())
    }

    fn prepare_output_root(&self) -> Result<(), AppError> {
        let plan = OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
            path: self.output_root.clone(),
        });
        ensure_delivered(deliver(plan)?).map(|_| ())
    }

    /// Output path of a page relative to the output root.
    fn relative_path<'p>(&self, page: &Page, paths: &'p PathMap) -> Result<&'p Path, AppError> {
        paths
            .get(&page.id)
            .ok_or_else(|| AppError::PathError(format!("No output path resolved for page {}", page.id)))
    }

    /// Absolute directory receiving a page's attachments.
    fn attachment_dir(&self, page: &Page, relative: &Path) -> PathBuf {
        let page_dir = relative.parent().unwrap_or_else(|| Path::new(""));
        self.output_root
            .join(page_dir)
            .join(ATTACHMENTS_DIR_NAME)
            .join(page.id.as_str())
    }
}

#[async_trait::async_trait]
impl PageSource for SpaceExporter<'_> {
    async fn fetch(&self, page: &Page, paths: &PathMap) -> Result<FetchedPage, AppError> {
        let relative = self.relative_path(page, paths)?;
        let detail = self.repo.retrieve_page(&page.id).await?;

        let attachments = match self.repo.list_attachments(&page.id).await {
            Ok(attachments) => attachments,
            Err(e) => {
                log::warn!("Could not list attachments of page {}: {}", page.id, e);
                Vec::new()
            }
        };

        let dest_dir = self.attachment_dir(page, relative);
        let mut outcomes = Vec::with_capacity(attachments.len());
        for attachment in &attachments {
            outcomes.push(materialize(self.repo, attachment, &dest_dir).await);
        }

        Ok(FetchedPage {
            detail,
            attachments: outcomes,
        })
    }
}

impl PageComposer for SpaceExporter<'_> {
    fn compose(
        &self,
        page: &Page,
        fetched: &FetchedPage,
        paths: &PathMap,
    ) -> Result<RenderedPage, AppError> {
        let relative = self.relative_path(page, paths)?;
        let body = rewrite(
            &fetched.detail.body,
            &page.id,
            paths,
            &attachment_dir_name(&page.id),
        );
        let document = wrap_document(&body);

        let (markdown, degraded) = match self.converter.convert(&document) {
            Ok(markdown) => (markdown, false),
            Err(e) => {
                log::warn!(
                    "Conversion with {} failed for page {}: {}; using plain text",
                    self.converter.name(),
                    page.id,
                    e
                );
                (PlainTextConverter.convert(&document)?, true)
            }
        };

        let front_matter = FrontMatter::for_page(&fetched.detail, page.display_title());

        Ok(RenderedPage {
            path: self.output_root.join(relative),
            content: format!("{}{}", front_matter.render(), markdown),
            degraded,
        })
    }
}

impl PageDelivery for SpaceExporter<'_> {
    fn deliver(&self, page: RenderedPage) -> Result<OutputReport, AppError> {
        let plan = OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: page.path,
            content: page.content,
        });
        deliver(plan)
    }
}

/// Bytes written by a fully successful delivery.
fn ensure_delivered(report: OutputReport) -> Result<usize, AppError> {
    if report.is_success() {
        Ok(report.bytes_written())
    } else {
        Err(AppError::DeliveryFailed {
            failures: report.failure_messages(),
        })
    }
}
