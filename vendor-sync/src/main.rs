use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use vendor_sync::config::{AppConfig, ConfigOverrides};
use vendor_sync::helpers::export::{publish_result, OutputFormat};
use vendor_sync::helpers::run_log::RunLog;
use vendor_sync::integrations::open_source;
use vendor_sync::jobs::run_vendor_update_scan;

#[derive(Parser, Debug)]
#[command(
    name = "vendor-sync",
    author,
    version,
    about = "Collect vendor updates (company code, vendor number, name) from recent mail"
)]
struct Args {
    /// Config file (defaults to <config dir>/esker-vendor-sync/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only consider messages received in the last N minutes
    #[arg(long)]
    minutes_back: Option<u32>,

    /// Distinct subject keywords required when no phrase matches
    #[arg(long)]
    min_keyword_hits: Option<usize>,

    /// Read saved .eml files from this directory instead of IMAP
    #[arg(long, value_name = "DIR", conflicts_with = "json_export")]
    eml_dir: Option<PathBuf>,

    /// Read a JSON message export instead of IMAP
    #[arg(long, value_name = "PATH")]
    json_export: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the result here instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Directory for per-run log_<timestamp>.txt files
    #[arg(long, value_name = "DIR")]
    run_log_dir: Option<PathBuf>,

    #[arg(long)]
    log_file_path: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            minutes_back: self.minutes_back,
            min_keyword_hits: self.min_keyword_hits,
            eml_dir: self.eml_dir.clone(),
            json_export: self.json_export.clone(),
            format: self.format,
            output: self.output.clone(),
            run_log_dir: self.run_log_dir.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_file_path.as_deref());

    let (mut config, config_path) =
        AppConfig::load(args.config.as_deref()).context("Failed to load config")?;
    config.apply_overrides(&args.overrides());
    tracing::info!("Using config at {:?}", config_path);

    let started = Local::now().naive_local();
    let run_log = config
        .output
        .run_log_dir
        .as_deref()
        .map(|dir| RunLog::create(dir, started))
        .transpose()?;

    let settings = config.scan.to_settings();
    let mut source = open_source(&config)?;
    let report = run_vendor_update_scan(source.as_mut(), &settings, Utc::now())?;

    publish_result(
        &report.result,
        config.output.format,
        config.output.path.as_deref(),
    )?;

    if let Some(run_log) = run_log {
        run_log.record_result(&report.result, Local::now().naive_local())?;
        tracing::info!("Run log written to {:?}", run_log.path());
    }

    Ok(())
}

fn init_tracing(log_file_path: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("vendor-sync.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}
