//! Output handling with clear separation of planning and execution.
//!
//! Path calculation and front matter rendering are pure; the writer and
//! the attachment materializer are the only places touching the disk.

mod attachments;
mod front_matter;
mod path_map;
pub mod paths;
mod types;
mod writer;

// Re-export the public interface
pub use attachments::{attachment_dir_name, materialize, MaterializeOutcome};
pub use front_matter::FrontMatter;
pub use path_map::{LinkTarget, PathMap};
pub use paths::{relative_link, sanitize_name};
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
