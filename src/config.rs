// src/config.rs
use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_DELAY_MS};
use crate::convert::ConverterKind;
use crate::error::AppError;
use crate::types::{BaseUrl, Credentials, SpaceKey};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const URL_ENV: &str = "CONFLUENCE_URL";
pub const EMAIL_ENV: &str = "CONFLUENCE_EMAIL";
pub const TOKEN_ENV: &str = "CONFLUENCE_API_TOKEN";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Key of the space to export (e.g., "DOCS")
    #[arg(short, long)]
    pub space: String,

    /// Confluence base URL, e.g. https://example.atlassian.net/wiki [env: CONFLUENCE_URL]
    #[arg(short, long)]
    pub url: Option<String>,

    /// Account email used for authentication [env: CONFLUENCE_EMAIL]
    #[arg(short, long)]
    pub email: Option<String>,

    /// API token used for authentication [env: CONFLUENCE_API_TOKEN]
    #[arg(short, long)]
    pub token: Option<String>,

    /// Directory the space is exported into
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// How page bodies are converted to Markdown
    #[arg(short, long, value_enum, default_value_t = ConverterKind::Pandoc)]
    pub converter: ConverterKind,

    /// Pandoc executable used by the pandoc converter
    #[arg(long, default_value = "pandoc")]
    pub pandoc_bin: String,

    /// Pause between API requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    pub request_delay_ms: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved export configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub space: SpaceKey,
    pub base_url: BaseUrl,
    pub credentials: Credentials,
    pub output_root: PathBuf,
    pub converter: ConverterKind,
    pub pandoc_bin: String,
    pub request_delay: Duration,
    pub verbose: bool,
}

impl ExportConfig {
    /// Resolves the configuration from CLI input, falling back to the
    /// process environment for the site URL and credentials.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Like [`ExportConfig::resolve`] with an explicit environment lookup.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(cli.url, URL_ENV, "--url", &env)?;
        let email = required(cli.email, EMAIL_ENV, "--email", &env)?;
        let token = required(cli.token, TOKEN_ENV, "--token", &env)?;

        Ok(ExportConfig {
            space: SpaceKey::new(cli.space)?,
            base_url: BaseUrl::parse(&url)?,
            credentials: Credentials::new(email, token)?,
            output_root: cli.output,
            converter: cli.converter,
            pandoc_bin: cli.pandoc_bin,
            request_delay: Duration::from_millis(cli.request_delay_ms),
            verbose: cli.verbose,
        })
    }
}

fn required<F>(
    value: Option<String>,
    env_key: &str,
    flag: &str,
    env: &F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    value
        .or_else(|| env(env_key))
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set and {} not given",
                env_key, flag
            ))
        })
}
