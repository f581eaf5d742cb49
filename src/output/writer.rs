//! Executes output operations by performing actual I/O.
//!
//! Documents are written through a temporary file in the destination
//! directory and renamed into place, so a page file is either the complete
//! new document or untouched.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Delivers the output plan, performing all I/O operations.
///
/// Each operation is attempted independently; failures are logged and
/// recorded in the report rather than returned.
pub fn deliver(plan: OutputPlan) -> Result<OutputReport, AppError> {
    let mut report = OutputReport::new();

    log::debug!(
        "Executing output plan with {} operations",
        plan.operations.len()
    );

    for operation in &plan.operations {
        match execute_operation(operation) {
            Ok(bytes_written) => report.record_completed(operation.path(), bytes_written),
            Err(e) => {
                log::error!("Operation on {} failed: {}", operation.path().display(), e);
                report.record_failed(operation.path(), e);
            }
        }
    }

    log::debug!(
        "Output plan execution complete: {} succeeded, {} failed",
        report.completed.len(),
        report.failed.len()
    );

    Ok(report)
}

/// Executes a single output operation.
fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::CreateDirectory { path } => {
            create_directory(path)?;
            Ok(0)
        }
    }
}

/// Writes content to a file atomically.
fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Dropped (and deleted) on any early return below.
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged
        .persist(path)
        .map_err(|e| AppError::Io(e.error))?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

/// Creates a directory.
fn create_directory(path: &Path) -> Result<(), AppError> {
    log::debug!("Creating directory: {}", path.display());

    if path.exists() {
        if path.is_dir() {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        } else {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Path exists but is not a directory: {}", path.display()),
            )));
        }
    }

    fs::create_dir_all(path)?;
    log::debug!("Created directory: {}", path.display());
    Ok(())
}
