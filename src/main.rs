//! `design-compare-mcp` - MCP server comparing design mockups with implementations.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use rmcp::ServiceExt;

use design_compare::cli::{ConfigArgs, init_tracing};
use design_compare::{DesignCompareServer, Pipeline};

/// Serve the `compare_design_implementation` tool over MCP on stdio.
#[derive(Parser, Debug)]
#[command(name = "design-compare-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return usage_exit(&err),
    };

    if let Err(err) = init_tracing(args.verbose) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = run(&args).await {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(args: &Args) -> Result<()> {
    let config = args.config.to_config().context("Invalid configuration")?;
    let pipeline = Pipeline::new(config).context("Failed to initialize pipeline")?;

    tracing::info!("Starting design-compare MCP server");

    let service = DesignCompareServer::new(Arc::new(pipeline))
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP service")?;

    service.waiting().await.context("MCP service terminated")?;

    tracing::info!("design-compare MCP server stopped");

    Ok(())
}

/// Print a clap parse outcome; help and version succeed, anything else fails with 1.
fn usage_exit(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
