// src/analytics/mod.rs
//! Counters describing one export run.

use crate::output::MaterializeOutcome;
use crate::types::PageId;

/// Outcome of a whole-space export, for the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages_listed: usize,
    pub pages_exported: usize,
    /// Pages that could not be exported, with the error that stopped them.
    pub failed_pages: Vec<(PageId, String)>,
    pub attachments_saved: usize,
    pub attachments_skipped: usize,
    pub attachments_rejected: usize,
    /// Pages whose body fell back to plain-text conversion.
    pub degraded_conversions: usize,
    /// Size of the written documents, attachments excluded.
    pub bytes_written: usize,
}

impl ExportSummary {
    pub fn pages_failed(&self) -> usize {
        self.failed_pages.len()
    }

    pub fn record_failure(&mut self, page: &PageId, error: impl ToString) {
        self.failed_pages.push((page.clone(), error.to_string()));
    }

    pub fn record_attachment(&mut self, outcome: &MaterializeOutcome) {
        match outcome {
            MaterializeOutcome::Saved { .. } => self.attachments_saved += 1,
            MaterializeOutcome::Skipped { .. } => self.attachments_skipped += 1,
            MaterializeOutcome::Rejected { .. } => self.attachments_rejected += 1,
        }
    }

    /// Logs the run totals.
    pub fn log(&self) {
        log::info!(
            "Exported {}/{} page(s) ({} bytes); {} failed",
            self.pages_exported,
            self.pages_listed,
            self.bytes_written,
            self.pages_failed()
        );
        log::info!(
            "Attachments: {} saved, {} skipped, {} rejected",
            self.attachments_saved,
            self.attachments_skipped,
            self.attachments_rejected
        );
        if self.degraded_conversions > 0 {
            log::warn!(
                "{} page(s) were converted as plain text",
                self.degraded_conversions
            );
        }
        for (id, error) in &self.failed_pages {
            log::debug!("  failed page {}: {}", id, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_attachment_outcomes_are_counted() {
        let mut summary = ExportSummary::default();
        summary.record_attachment(&MaterializeOutcome::Saved {
            path: PathBuf::from("a.png"),
            bytes: 1,
        });
        summary.record_attachment(&MaterializeOutcome::Rejected {
            name: "..".to_string(),
        });
        summary.record_attachment(&MaterializeOutcome::Skipped {
            name: "b.png".to_string(),
            reason: "404".to_string(),
        });
        summary.record_failure(&PageId::parse("7").unwrap(), "boom");

        assert_eq!(summary.attachments_saved, 1);
        assert_eq!(summary.attachments_rejected, 1);
        assert_eq!(summary.attachments_skipped, 1);
        assert_eq!(summary.pages_failed(), 1);
    }
}
