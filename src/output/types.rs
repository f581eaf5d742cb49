//! Output plans and the report of carrying one out.

use std::path::{Path, PathBuf};

/// Filesystem changes to make, in order.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }
}

#[derive(Debug, Clone)]
pub enum DeliveryTarget {
    /// Write a finished document, replacing any previous export
    WriteFile { path: PathBuf, content: String },
    /// Make sure a directory exists
    CreateDirectory { path: PathBuf },
}

impl DeliveryTarget {
    pub fn path(&self) -> &Path {
        match self {
            DeliveryTarget::WriteFile { path, .. } | DeliveryTarget::CreateDirectory { path } => {
                path
            }
        }
    }
}

/// What happened to each operation of a plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completed(&mut self, path: &Path, bytes_written: usize) {
        self.completed.push(CompletedOperation {
            path: path.to_path_buf(),
            bytes_written,
        });
    }

    pub fn record_failed(&mut self, path: &Path, error: impl ToString) {
        self.failed.push(FailedOperation {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Bytes written by all completed operations.
    pub fn bytes_written(&self) -> usize {
        self.completed.iter().map(|op| op.bytes_written).sum()
    }

    /// One `path: error` line per failed operation.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|op| format!("{}: {}", op.path.display(), op.error))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedOperation {
    pub path: PathBuf,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedOperation {
    pub path: PathBuf,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals_and_failures() {
        let mut report = OutputReport::new();
        report.record_completed(Path::new("A.md"), 10);
        report.record_completed(Path::new("A/B.md"), 5);
        assert!(report.is_success());
        assert_eq!(report.bytes_written(), 15);

        report.record_failed(Path::new("A/C.md"), "permission denied");
        assert!(!report.is_success());
        assert_eq!(report.failure_messages(), vec!["A/C.md: permission denied"]);
    }
}
