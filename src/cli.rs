//! Command-line options and logging setup shared by both binaries.

use clap::Args;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::compare::{DEFAULT_THRESHOLD, DiffOptions};
use crate::error::Result;
use crate::image::{DEFAULT_FORMATS, parse_formats};
use crate::pipeline::{Config, DEFAULT_MAX_INLINE_BYTES};

/// Comparison settings accepted on the command line.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Matching threshold (0.0-1.0). Smaller values flag subtler differences.
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, value_name = "FLOAT")]
    pub threshold: f64,

    /// Count anti-aliased edge pixels as differences.
    #[arg(long)]
    pub include_aa: bool,

    /// Opacity of the faded design behind the diff markers (0.0-1.0).
    #[arg(long, default_value_t = 0.1, value_name = "FLOAT")]
    pub alpha: f64,

    /// Marker color for differing pixels, as R,G,B.
    #[arg(long, default_value = "255,0,0", value_name = "R,G,B", value_parser = parse_color)]
    pub diff_color: [u8; 3],

    /// Marker color for anti-aliased pixels, as R,G,B.
    #[arg(long, default_value = "255,255,0", value_name = "R,G,B", value_parser = parse_color)]
    pub aa_color: [u8; 3],

    /// Draw only the markers on a transparent background.
    #[arg(long)]
    pub diff_mask: bool,

    /// Accepted input formats, comma separated (e.g. png,jpeg,webp).
    #[arg(long, value_name = "LIST")]
    pub formats: Option<String>,

    /// JPEG quality (1-100) when the diff is written as JPEG.
    #[arg(short, long, default_value = "95", value_name = "INT")]
    pub quality: u8,

    /// Largest inline base64 diff to return when no output path is given.
    #[arg(long, default_value_t = DEFAULT_MAX_INLINE_BYTES, value_name = "BYTES")]
    pub max_inline_bytes: usize,
}

impl ConfigArgs {
    /// Build and validate a pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the format list is invalid or a value is out of range.
    pub fn to_config(&self) -> Result<Config> {
        let formats = match &self.formats {
            Some(list) => parse_formats(list)?,
            None => DEFAULT_FORMATS.to_vec(),
        };

        let config = Config {
            diff: DiffOptions {
                threshold: self.threshold,
                include_aa: self.include_aa,
                alpha: self.alpha,
                diff_color: self.diff_color,
                aa_color: self.aa_color,
                diff_mask: self.diff_mask,
            },
            formats,
            output_quality: self.quality,
            max_inline_bytes: self.max_inline_bytes,
        };
        config.validate()?;

        Ok(config)
    }
}

fn parse_color(value: &str) -> std::result::Result<[u8; 3], String> {
    let channels: Vec<u8> = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|err| format!("invalid color channel in '{value}': {err}"))?;

    <[u8; 3]>::try_from(channels).map_err(|_| format!("expected R,G,B, got '{value}'"))
}

/// Initialize logging to standard error.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `info`, or
/// `debug` when `verbose` is set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> std::result::Result<(), TryInitError> {
    let log_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("design_compare={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_defaults_match_config_default() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.config.to_config().unwrap(), Config::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--threshold",
            "0.25",
            "--include-aa",
            "--diff-color",
            "0, 255, 0",
            "--formats",
            "png,webp",
        ]);
        let config = cli.config.to_config().unwrap();

        assert_eq!(config.diff.threshold, 0.25);
        assert!(config.diff.include_aa);
        assert_eq!(config.diff.diff_color, [0, 255, 0]);
        assert_eq!(config.formats.len(), 2);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let cli = TestCli::parse_from(["test", "--threshold", "1.5"]);
        assert!(cli.config.to_config().is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("1,2,3"), Ok([1, 2, 3]));
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("1,2,300").is_err());
    }
}
