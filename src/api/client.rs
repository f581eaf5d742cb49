// src/api/client.rs
//! HTTP client wrapper for the Confluence REST API.
//!
//! This module provides a thin wrapper around reqwest that handles
//! authentication, request pacing and raw request/response operations.
//! Parsing lives in [`super::parser`].

use super::parser;
use super::simple_pagination::fetch_all_pages_simple;
use crate::constants::{
    CONFLUENCE_PAGE_SIZE, LISTING_EXPAND, PAGE_DETAIL_EXPAND, RETRY_ATTEMPTS,
    RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_MS,
};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::{Attachment, Page, PageDetail};
use crate::types::{BaseUrl, Credentials, PageId, SpaceKey};
use reqwest::{header, Client, Response};
use std::io::Write;
use std::time::Duration;

/// A thin wrapper around reqwest Client for Confluence requests.
#[derive(Clone)]
pub struct ConfluenceHttpClient {
    client: Client,
    base_url: BaseUrl,
    credentials: Credentials,
    request_delay: Duration,
}

impl ConfluenceHttpClient {
    /// Creates a new HTTP client for one Confluence site.
    pub fn new(
        base_url: BaseUrl,
        credentials: Credentials,
        request_delay: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
            request_delay,
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Makes an authenticated GET request to an absolute URL.
    pub async fn get(&self, url: &str) -> Result<Response, AppError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(self.credentials.email(), Some(self.credentials.token()))
            .send()
            .await?;

        log::debug!("{} -> {}", url, response.status());
        Ok(response)
    }

    /// Makes a GET request to a REST endpoint path and parses the answer,
    /// retrying transient failures.
    async fn get_endpoint<T, P>(
        &self,
        path: &str,
        query: &[(&str, String)],
        parse: P,
    ) -> Result<T, AppError>
    where
        P: Fn(ApiResponse<String>) -> Result<T, AppError>,
    {
        let mut url = url::Url::parse(&self.base_url.endpoint(path))
            .map_err(|e| invalid_endpoint(path, e))?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));

        let url = url.as_str();
        let parse = &parse;
        retry_with_backoff(
            move || async move {
                let response = self.get(url).await?;
                parse(extract_response_text(response).await?)
            },
            RETRY_ATTEMPTS,
            Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            Duration::from_millis(RETRY_MAX_DELAY_MS),
        )
        .await
    }

    async fn list_pages_from(
        &self,
        space: &SpaceKey,
        start: usize,
        limit: usize,
    ) -> Result<super::types::PaginatedResponse<Page>, AppError> {
        let query = [
            ("spaceKey", space.as_str().to_string()),
            ("type", "page".to_string()),
            ("limit", limit.to_string()),
            ("start", start.to_string()),
            ("expand", LISTING_EXPAND.to_string()),
        ];
        self.get_endpoint("rest/api/content", &query, parser::parse_page_listing)
            .await
    }

    async fn list_attachments_from(
        &self,
        page: &PageId,
        start: usize,
        limit: usize,
    ) -> Result<super::types::PaginatedResponse<Attachment>, AppError> {
        let path = format!("rest/api/content/{}/child/attachment", page);
        let query = [("limit", limit.to_string()), ("start", start.to_string())];
        self.get_endpoint(&path, &query, parser::parse_attachment_listing)
            .await
    }
}

#[async_trait::async_trait]
impl super::ConfluenceRepository for ConfluenceHttpClient {
    async fn list_pages(&self, space: &SpaceKey) -> Result<Vec<Page>, AppError> {
        let pages = fetch_all_pages_simple(
            move |start, limit| self.list_pages_from(space, start, limit),
            CONFLUENCE_PAGE_SIZE,
            self.request_delay,
        )
        .await
        .into_complete()?;

        log::info!("Listed {} page(s) in space {}", pages.len(), space);
        Ok(pages)
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<PageDetail, AppError> {
        let path = format!("rest/api/content/{}", id);
        let query = [("expand", PAGE_DETAIL_EXPAND.to_string())];
        self.get_endpoint(&path, &query, parser::parse_page_detail)
            .await
    }

    async fn list_attachments(&self, page: &PageId) -> Result<Vec<Attachment>, AppError> {
        let attachments = fetch_all_pages_simple(
            move |start, limit| self.list_attachments_from(page, start, limit),
            CONFLUENCE_PAGE_SIZE,
            self.request_delay,
        )
        .await
        .into_partial(&format!("attachments of page {}", page));

        Ok(attachments)
    }

    async fn download_attachment(
        &self,
        attachment: &Attachment,
        sink: &mut (dyn Write + Send),
    ) -> Result<u64, AppError> {
        let link = attachment.download.as_deref().ok_or_else(|| {
            AppError::MalformedResponse(format!("Attachment {} has no download link", attachment.id))
        })?;
        let url = self.base_url.resolve_link(link)?;

        let mut response = self.get(url.as_str()).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parser::parse_error(&body, status, url.as_str()));
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        sink.flush()?;

        log::debug!("Downloaded {} bytes for attachment {}", written, attachment.id);
        Ok(written)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

fn invalid_endpoint(path: &str, err: url::ParseError) -> AppError {
    AppError::InternalError {
        message: format!("Invalid endpoint URL for {}", path),
        source: Some(Box::new(err)),
    }
}
