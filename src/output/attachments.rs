//! Attachment materialization: one page's files written into its private
//! attachment directory.

use super::paths::{is_contained_in, sanitize_name};
use crate::api::ConfluenceRepository;
use crate::constants::ATTACHMENTS_DIR_NAME;
use crate::error::AppError;
use crate::model::Attachment;
use crate::types::PageId;
use std::fs;
use std::path::{Path, PathBuf};

/// Attachment directory of a page, relative to the page's own directory.
pub fn attachment_dir_name(page: &PageId) -> String {
    format!("{}/{}", ATTACHMENTS_DIR_NAME, page)
}

/// What happened to one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// Written to disk.
    Saved { path: PathBuf, bytes: u64 },
    /// Its name would not stay inside the destination directory.
    Rejected { name: String },
    /// Nothing to write: no usable name or locator, or the download failed.
    Skipped { name: String, reason: String },
}

impl MaterializeOutcome {
    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            MaterializeOutcome::Saved { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.saved_path().is_some()
    }
}

/// Downloads an attachment into `dest_dir` under its sanitized name.
///
/// Never fails: every problem is logged and reported as a non-saved
/// outcome. The body is streamed into a temporary file inside `dest_dir`
/// and only renamed to the final name once complete.
pub async fn materialize(
    repo: &dyn ConfluenceRepository,
    attachment: &Attachment,
    dest_dir: &Path,
) -> MaterializeOutcome {
    let raw_name = attachment.file_name().unwrap_or_default();
    let name = sanitize_name(&raw_name);

    if name.is_empty() {
        log::warn!("Skipping attachment {}: no usable file name", attachment.id);
        return MaterializeOutcome::Skipped {
            name: raw_name,
            reason: "no usable file name".to_string(),
        };
    }

    let target = dest_dir.join(&name);
    if !is_contained_in(&target, dest_dir) {
        log::warn!(
            "Rejecting attachment {} ('{}'): resolves outside {}",
            attachment.id,
            raw_name,
            dest_dir.display()
        );
        return MaterializeOutcome::Rejected { name: raw_name };
    }

    if attachment.download.is_none() {
        log::warn!("Skipping attachment '{}': no download link", name);
        return MaterializeOutcome::Skipped {
            name,
            reason: "no download link".to_string(),
        };
    }

    match download_into(repo, attachment, dest_dir, &target).await {
        Ok(bytes) => {
            log::debug!("Saved attachment {} ({} bytes)", target.display(), bytes);
            MaterializeOutcome::Saved {
                path: target,
                bytes,
            }
        }
        Err(e) => {
            log::warn!("Failed to download attachment '{}': {}", name, e);
            MaterializeOutcome::Skipped {
                name,
                reason: e.to_string(),
            }
        }
    }
}

async fn download_into(
    repo: &dyn ConfluenceRepository,
    attachment: &Attachment,
    dest_dir: &Path,
    target: &Path,
) -> Result<u64, AppError> {
    fs::create_dir_all(dest_dir)?;

    // Removed on drop unless persisted.
    let mut staged = tempfile::NamedTempFile::new_in(dest_dir)?;
    let bytes = repo.download_attachment(attachment, staged.as_file_mut()).await?;
    staged.persist(target).map_err(|e| AppError::Io(e.error))?;

    Ok(bytes)
}
