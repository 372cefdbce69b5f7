//! OWS request admission CLI.
//!
//! Admits a single WMS/WFS request against a server configuration and
//! prints the outcome as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ows_admit::config::ServerConfig;
use ows_common::RequestParams;

#[derive(Parser, Debug)]
#[command(name = "ows-admit")]
#[command(about = "Check whether an OGC WMS/WFS request would be admitted")]
struct Args {
    /// Server configuration file (YAML)
    #[arg(short, long, env = "OWS_CONFIG", default_value = "config/server.yaml")]
    config: PathBuf,

    /// Request parameters as a URL query string
    #[arg(short, long, default_value = "")]
    query: String,

    /// XML request body; turns the request into an XML POST
    #[arg(short, long)]
    body: Option<PathBuf>,

    /// Content type of the XML body
    #[arg(long, default_value = "text/xml")]
    content_type: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::load(&args.config)?;

    let params = RequestParams::from_query(&args.query)
        .with_context(|| format!("Failed to decode query {:?}", args.query))?;

    let body = match &args.body {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("Failed to read request body {:?}", path))?,
        ),
        None => None,
    };

    let transport = ows_admit::transport_for(&args.query, body, &args.content_type);
    info!(method = %transport.method, params = params.len(), "Admitting request");

    let report = ows_admit::admit(&config, &params, &transport);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(if report.is_admitted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
