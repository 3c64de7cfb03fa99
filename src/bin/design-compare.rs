//! `design-compare` CLI - compare a design image with an implementation screenshot.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;

use design_compare::cli::{ConfigArgs, init_tracing};
use design_compare::{CompareDesign, ComparisonRequest, ComparisonResult, Pipeline};

/// Compare a design image with an implementation screenshot pixel by pixel.
#[derive(Parser, Debug)]
#[command(name = "design-compare")]
#[command(version, about, long_about = None)]
struct Args {
    /// Design mockup image path.
    #[arg(value_name = "DESIGN")]
    design: PathBuf,

    /// Implementation screenshot path.
    #[arg(value_name = "IMPLEMENTATION")]
    implementation: PathBuf,

    /// Where to write the diff image.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Print the full result as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return usage_exit(&err),
    };

    if let Err(err) = init_tracing(args.verbose) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(result) => {
            if let Err(err) = report(&result, args.json) {
                eprintln!("Error: {err:#}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ComparisonResult> {
    let config = args.config.to_config().context("Invalid configuration")?;
    let pipeline = Pipeline::new(config).context("Failed to initialize pipeline")?;

    let mut request = ComparisonRequest::new(&args.design, &args.implementation);
    if let Some(output) = &args.output {
        request = request.with_output(output);
    }

    pipeline.compare(&request).map_err(|err| {
        let kind = err.kind();
        anyhow::Error::new(err).context(kind)
    })
}

fn report(result: &ComparisonResult, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(result).context("Failed to render result")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Total pixels:      {}", result.total_pixels);
    println!("Different pixels:  {}", result.different_pixels);
    println!("Difference:        {:.2}%", result.difference_percentage);

    match result.diff_image_path() {
        Some(path) => println!("Diff image:        {}", path.display()),
        None => println!("Diff image:        not written (pass OUTPUT, or --json for inline base64)"),
    }

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
