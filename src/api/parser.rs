// src/api/parser.rs
//! Turns raw HTTP responses into domain values or typed errors.

use super::client::ApiResponse;
use super::responses::{AttachmentDto, ContentDto, ContentListResponse, ErrorBody, ToDomain};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, ConfluenceErrorCode};
use crate::model::{Attachment, Page, PageDetail};
use reqwest::StatusCode;

/// Parses any Confluence response: the body on success, an error otherwise.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        serde_json::from_str(&result.data).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", result.url, e);
            AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
        })
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

/// Builds the service error for a non-success response.
pub fn parse_error(body: &str, status: StatusCode, url: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {} from {}: {}", status, url, preview(body)));

    AppError::ConfluenceService {
        code: ConfluenceErrorCode::from_http_status(status.as_u16()),
        message,
        status,
    }
}

/// Parses one page of a space listing.
pub fn parse_page_listing(result: ApiResponse<String>) -> Result<PaginatedResponse<Page>, AppError> {
    let response: ContentListResponse<ContentDto> = parse_api_response(result)?;
    into_paginated(response)
}

/// Parses a single page's full detail.
pub fn parse_page_detail(result: ApiResponse<String>) -> Result<PageDetail, AppError> {
    let content: ContentDto = parse_api_response(result)?;
    content.to_domain()
}

/// Parses one page of a page's attachment listing.
pub fn parse_attachment_listing(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Attachment>, AppError> {
    let response: ContentListResponse<AttachmentDto> = parse_api_response(result)?;
    into_paginated(response)
}

fn into_paginated<W, T>(response: ContentListResponse<W>) -> Result<PaginatedResponse<T>, AppError>
where
    W: ToDomain<T>,
{
    let has_more = response.has_next();
    let start = response.start;
    let results = response
        .results
        .into_iter()
        .map(ToDomain::to_domain)
        .collect::<Result<Vec<T>, AppError>>()?;

    Ok(PaginatedResponse {
        results,
        start,
        has_more,
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://example.atlassian.net/wiki/rest/api/content".to_string(),
        }
    }

    #[test]
    fn test_parse_page_listing() {
        let body = r#"{
            "results": [
                {"id": "1", "type": "page", "title": "Root", "ancestors": []},
                {"id": "2", "type": "page", "title": "Child",
                 "ancestors": [{"id": "1", "type": "page", "title": "Root"}]}
            ],
            "start": 0, "limit": 50, "size": 2,
            "_links": {"next": "/rest/api/content?spaceKey=DOC&start=50"}
        }"#;

        let page = parse_page_listing(response(StatusCode::OK, body)).unwrap();

        assert!(page.has_more);
        assert_eq!(page.start, 0);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].title.as_deref(), Some("Child"));
        assert_eq!(page.results[1].ancestors[0].title.as_deref(), Some("Root"));
        assert_eq!(
            page.results[1].ancestors[0].id.as_ref().map(|id| id.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_last_listing_page_has_no_next() {
        let body = r#"{"results": [], "start": 50, "limit": 50, "size": 0, "_links": {}}"#;
        let page = parse_page_listing(response(StatusCode::OK, body)).unwrap();
        assert!(!page.has_more);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_parse_page_detail() {
        let body = r#"{
            "id": "2", "title": "Child",
            "body": {"storage": {"value": "<p>Hi</p>", "representation": "storage"}},
            "version": {"number": 7, "when": "2024-03-01T10:15:00.000Z"},
            "metadata": {"labels": {"results": [{"name": "howto"}, {"name": "draft"}]}}
        }"#;

        let detail = parse_page_detail(response(StatusCode::OK, body)).unwrap();

        assert_eq!(detail.body, "<p>Hi</p>");
        assert_eq!(detail.version, Some(7));
        assert_eq!(detail.labels, vec!["howto", "draft"]);
        assert_eq!(
            detail.updated.map(|t| t.to_rfc3339()),
            Some("2024-03-01T10:15:00+00:00".to_string())
        );
    }

    #[test]
    fn test_page_detail_without_body() {
        let detail = parse_page_detail(response(StatusCode::OK, r#"{"id": "9", "title": "Empty"}"#))
            .unwrap();
        assert_eq!(detail.body, "");
        assert!(detail.labels.is_empty());
        assert_eq!(detail.version, None);
    }

    #[test]
    fn test_parse_attachment_listing() {
        let body = r#"{
            "results": [{"id": "att10", "title": "diagram.png",
                         "_links": {"download": "/download/attachments/2/diagram.png?api=v2"}}],
            "start": 0, "limit": 50, "size": 1, "_links": {}
        }"#;

        let page = parse_attachment_listing(response(StatusCode::OK, body)).unwrap();
        assert_eq!(page.results[0].file_name().as_deref(), Some("diagram.png"));
        assert_eq!(
            page.results[0].download.as_deref(),
            Some("/download/attachments/2/diagram.png?api=v2")
        );
    }

    #[test]
    fn test_error_body_becomes_service_error() {
        let body = r#"{"statusCode": 404, "message": "No content found with id: ContentId{id=7}"}"#;
        let err = parse_page_detail(response(StatusCode::NOT_FOUND, body)).unwrap_err();

        match err {
            AppError::ConfluenceService { code, message, status } => {
                assert_eq!(code, ConfluenceErrorCode::NotFound);
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(message.starts_with("No content found"));
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body_is_previewed() {
        let body = "x".repeat(500);
        let err = parse_error(&body, StatusCode::BAD_GATEWAY, "https://host/wiki");
        let AppError::ConfluenceService { code, message, .. } = err else {
            panic!("expected service error");
        };
        assert_eq!(code, ConfluenceErrorCode::ServerError(502));
        assert!(message.ends_with("..."));
        assert!(message.len() < 300);
    }

    #[test]
    fn test_malformed_success_body() {
        let err = parse_page_detail(response(StatusCode::OK, "<html>login</html>")).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
