// src/lib.rs
//! confluence2md library: exports a Confluence space into a tree of
//! Markdown files whose links and images point at each other on disk.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ConversionError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ExportConfig`
//! - **Domain model**: `Page`, `PageDetail`, `Attachment`, `Ancestor`
//! - **Domain types**: `PageId`, `AttachmentId`, `SpaceKey`, `BaseUrl`, `Credentials`
//! - **API client**: `ConfluenceRepository`, `ConfluenceHttpClient`
//! - **Core**: `sanitize_name`, `PathMap`, `rewrite`, `materialize`
//! - **Export**: `SpaceExporter`, `ExportSummary`

mod analytics;
mod api;
mod config;
mod constants;
mod convert;
mod error;
mod error_recovery;
mod export;
mod markup;
mod model;
mod output;
mod pipeline;
mod rewrite;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ConfluenceErrorCode, ConversionError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig};

// --- Domain Model ---
pub use crate::model::{Ancestor, Attachment, Page, PageDetail};

// --- Domain Types ---
pub use crate::types::{AttachmentId, BaseUrl, Credentials, PageId, SpaceKey};

// --- API Client ---
pub use crate::api::{client::ApiResponse, ConfluenceHttpClient, ConfluenceRepository};

// --- Core ---
pub use crate::markup::{parse_fragment, Element, Fragment, Node};
pub use crate::output::{
    attachment_dir_name, deliver, materialize, relative_link, sanitize_name, DeliveryTarget,
    FrontMatter, LinkTarget, MaterializeOutcome, OutputPlan, OutputReport, PathMap,
};
pub use crate::rewrite::{rewrite, PageTarget, Reference, Resolution, RewriteContext};

// --- Conversion ---
pub use crate::convert::{wrap_document, Converter, ConverterKind, PandocConverter, PlainTextConverter};

// --- Export ---
pub use crate::analytics::ExportSummary;
pub use crate::export::SpaceExporter;

// --- Pipeline Traits ---
pub use crate::pipeline::{FetchedPage, PageComposer, PageDelivery, PageSource, RenderedPage};
