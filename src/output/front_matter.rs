//! YAML front matter prepended to every exported page.

use crate::model::PageDetail;
use chrono::{DateTime, SecondsFormat, Utc};

/// Page metadata rendered as a YAML header.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub id: String,
    pub labels: Vec<String>,
    pub version: Option<u64>,
    pub updated: Option<DateTime<Utc>>,
}

impl FrontMatter {
    /// Front matter for a page, using `fallback_title` when the detail has none.
    pub fn for_page(detail: &PageDetail, fallback_title: &str) -> Self {
        let title = detail
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(fallback_title);

        Self {
            title: title.to_string(),
            id: detail.id.to_string(),
            labels: detail.labels.clone(),
            version: detail.version,
            updated: detail.updated,
        }
    }

    /// Renders the header, closing delimiter and blank line included.
    ///
    /// Strings are emitted as double-quoted scalars, which YAML reads with
    /// the same escapes as JSON.
    pub fn render(&self) -> String {
        let labels = self
            .labels
            .iter()
            .map(|label| quote(label))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::from("---\n");
        out.push_str(&format!("title: {}\n", quote(&self.title)));
        out.push_str(&format!("id: {}\n", quote(&self.id)));
        out.push_str(&format!("labels: [{}]\n", labels));
        match self.version {
            Some(version) => out.push_str(&format!("version: {}\n", version)),
            None => out.push_str("version: null\n"),
        }
        if let Some(updated) = self.updated {
            let stamp = updated.to_rfc3339_opts(SecondsFormat::Secs, true);
            out.push_str(&format!("updated: {}\n", quote(&stamp)));
        }
        out.push_str("---\n\n");
        out
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
