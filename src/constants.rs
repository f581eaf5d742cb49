//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Confluence API boundaries
// ---------------------------------------------------------------------------

/// How many pages or attachments are requested per listing call.
pub const CONFLUENCE_PAGE_SIZE: usize = 50;

/// Fixed pause between consecutive requests, in milliseconds.
///
/// Confluence Cloud throttles aggressive clients; a small constant delay
/// keeps a full-space export under the limit without adaptive backoff.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;

/// Expansions requested when listing a space.
pub const LISTING_EXPAND: &str = "ancestors";

/// Expansions requested for a single page's full detail.
pub const PAGE_DETAIL_EXPAND: &str = "body.storage,version,ancestors,metadata.labels";

/// Attempts per request when Confluence answers 429 or 5xx.
pub const RETRY_ATTEMPTS: u32 = 3;

/// First backoff delay between retries, in milliseconds; doubles per attempt.
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;

/// Upper bound for the backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Output layout
// ---------------------------------------------------------------------------

/// Longest path segment the name sanitizer emits, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Extension given to every exported page.
pub const OUTPUT_EXTENSION: &str = "md";

/// Directory, next to a page's file, holding per-page attachment folders.
pub const ATTACHMENTS_DIR_NAME: &str = "_attachments";

/// Default output directory when none is given on the command line.
pub const DEFAULT_OUTPUT_DIR: &str = "confluence_export";

/// Name used for a page whose title is missing or sanitizes to nothing.
pub const UNTITLED_PAGE_PREFIX: &str = "page_";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
