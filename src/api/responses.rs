// src/api/responses.rs
//! Wire shapes of the Confluence REST API (`/rest/api/content`).
//!
//! Only the fields the export reads are declared; everything else in the
//! payload is ignored by serde.

use crate::error::AppError;
use crate::model::{Ancestor, Attachment, Page, PageDetail};
use crate::types::{AttachmentId, PageId};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Offset-paginated result envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub size: usize,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl<T> ContentListResponse<T> {
    pub fn has_next(&self) -> bool {
        self.links.next.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub next: Option<String>,
    pub download: Option<String>,
}

/// A content entity: a page in a listing or a page's full detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDto {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub ancestors: Vec<AncestorDto>,
    pub body: Option<BodyDto>,
    pub version: Option<VersionDto>,
    pub metadata: Option<MetadataDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AncestorDto {
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodyDto {
    pub storage: Option<StorageDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageDto {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDto {
    pub number: Option<u64>,
    pub when: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataDto {
    pub labels: Option<LabelsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelsDto {
    #[serde(default)]
    pub results: Vec<LabelDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelDto {
    pub name: String,
}

/// An attachment entry under `/child/attachment`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentDto {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

/// Error body, e.g. `{"statusCode": 404, "message": "No content found"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

/// Conversion from wire types to domain types.
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<Page> for ContentDto {
    fn to_domain(self) -> Result<Page, AppError> {
        Ok(Page {
            id: PageId::parse(&self.id)?,
            title: self.title,
            ancestors: self.ancestors.into_iter().map(AncestorDto::into_ancestor).collect(),
        })
    }
}

impl ToDomain<PageDetail> for ContentDto {
    fn to_domain(self) -> Result<PageDetail, AppError> {
        let body = self
            .body
            .and_then(|body| body.storage)
            .map(|storage| storage.value)
            .unwrap_or_default();

        let labels = self
            .metadata
            .and_then(|metadata| metadata.labels)
            .map(|labels| labels.results.into_iter().map(|label| label.name).collect())
            .unwrap_or_default();

        let (version, updated) = match self.version {
            Some(version) => (version.number, version.when.as_deref().and_then(parse_timestamp)),
            None => (None, None),
        };

        Ok(PageDetail {
            id: PageId::parse(&self.id)?,
            title: self.title,
            body,
            labels,
            version,
            updated,
        })
    }
}

impl ToDomain<Attachment> for AttachmentDto {
    fn to_domain(self) -> Result<Attachment, AppError> {
        Ok(Attachment {
            id: AttachmentId::parse(&self.id)?,
            title: self.title,
            download: self.links.download,
        })
    }
}

impl AncestorDto {
    fn into_ancestor(self) -> Ancestor {
        Ancestor {
            id: self.id.as_deref().and_then(|id| PageId::parse(id).ok()),
            title: self.title,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            log::debug!("Ignoring unparseable timestamp '{}': {}", raw, e);
            None
        }
    }
}
