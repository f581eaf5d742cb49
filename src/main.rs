// src/main.rs
use anyhow::Context;
use clap::Parser;
use confluence2md::{
    CommandLineInput, ConfluenceHttpClient, ExportConfig, ExportSummary, SpaceExporter,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("confluence2md.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Prints the end-of-run report.
fn report_completion(config: &ExportConfig, summary: &ExportSummary) {
    println!(
        "✓ Exported {}/{} page(s) to {} ({} bytes)",
        summary.pages_exported,
        summary.pages_listed,
        config.output_root.display(),
        summary.bytes_written
    );

    if summary.attachments_saved > 0 {
        println!("✓ Saved {} attachment(s)", summary.attachments_saved);
    }

    let not_saved = summary.attachments_skipped + summary.attachments_rejected;
    if not_saved > 0 {
        eprintln!("⚠️  {} attachment(s) were not saved; see the log for details.", not_saved);
    }

    if summary.degraded_conversions > 0 {
        eprintln!(
            "⚠️  {} page(s) were exported as plain text because conversion failed.",
            summary.degraded_conversions
        );
    }

    if summary.pages_failed() > 0 {
        eprintln!("⚠️  {} page(s) failed:", summary.pages_failed());
        for (id, error) in &summary.failed_pages {
            eprintln!("   {}: {}", id, error);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = ExportConfig::resolve(cli)?;
    log::info!(
        "Exporting space {} from {} into {}",
        config.space,
        config.base_url,
        config.output_root.display()
    );

    let client = ConfluenceHttpClient::new(
        config.base_url.clone(),
        config.credentials.clone(),
        config.request_delay,
    )?;
    let converter = config.converter.build(&config.pandoc_bin);

    let summary = SpaceExporter::new(&client, converter.as_ref(), &config.output_root)
        .with_request_delay(config.request_delay)
        .run(&config.space)
        .await
        .with_context(|| format!("Export of space {} failed", config.space))?;

    report_completion(&config, &summary);

    Ok(())
}
