//! tomba-mcp-server: MCP server for the Tomba email and contact discovery API
//!
//! Serves the Tomba tools, resources and prompts to AI assistants over
//! stdio (default) or streamable HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use tomba_mcp::client::{HttpApi, TombaClient};
use tomba_mcp::config::{self, Config};
use tomba_mcp::dispatch::Dispatcher;
use tomba_mcp::mcp::server::McpServer;
use tomba_mcp::mcp::{http, transport};

/// Transport serving the MCP session(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// Streamable HTTP with SSE notifications.
    Http,
}

/// MCP server for the Tomba email and contact discovery API.
///
/// Exposes domain search, email finding and verification, phone lookups
/// and company search as MCP tools, with resources and workflow prompts.
#[derive(Parser, Debug)]
#[command(name = "tomba-mcp-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Transport to serve
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP bind host (overrides the configuration file)
    #[arg(long)]
    host: Option<String>,

    /// HTTP bind port (overrides the configuration file)
    #[arg(long)]
    port: Option<u16>,

    /// Tomba API key
    #[arg(long, env = "TOMBA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tomba secret key
    #[arg(long, env = "TOMBA_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. Logs always go to stderr; stdout
/// carries the stdio transport.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the dispatcher, with a client only when both keys are known.
fn build_dispatcher(
    cfg: &Config,
    api_key: Option<String>,
    secret_key: Option<String>,
) -> Dispatcher {
    let Some(credentials) = cfg.resolve_credentials(api_key, secret_key) else {
        warn!(
            "No Tomba credentials configured; tool calls will fail until \
             TOMBA_API_KEY and TOMBA_SECRET_KEY are set"
        );
        return Dispatcher::new(None);
    };

    let timeout = Duration::from_secs(cfg.api.timeout_secs);
    match HttpApi::new(credentials, &cfg.api.base_url, timeout) {
        Ok(api) => {
            info!(base_url = %cfg.api.base_url, "Tomba client ready");
            Dispatcher::new(Some(TombaClient::new(Arc::new(api))))
        }
        Err(e) => {
            error!(error = %e, "Failed to build the Tomba client");
            Dispatcher::new(None)
        }
    }
}

/// Entry point for the tomba-mcp-server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let mut cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "tomba-mcp-server {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?args.transport,
        "Starting tomba-mcp-server"
    );

    if let Some(host) = args.host {
        cfg.http.host = host;
    }
    if let Some(port) = args.port {
        cfg.http.port = port;
    }

    let dispatcher = build_dispatcher(&cfg, args.api_key, args.secret_key);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.transport {
        Transport::Stdio => runtime.block_on(transport::run_stdio(McpServer::new(dispatcher))),
        Transport::Http => runtime.block_on(http::serve(dispatcher, &cfg.http)),
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
