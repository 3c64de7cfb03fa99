//! # design-compare
//!
//! Compare a design mockup against an implementation screenshot and report
//! how many pixels differ, with a diff image highlighting where.
//!
//! Each comparison is a single stateless pass: both files are decoded to
//! RGBA rasters, compared pixel by pixel with a perceptual YIQ color
//! distance, and the diff is either written to disk or returned inline as
//! base64 PNG. The same operation is served over MCP on stdio
//! ([`server`]) and from the command line.
//!
//! ## Example
//!
//! ```no_run
//! use design_compare::{CompareDesign, ComparisonRequest, Config, Pipeline};
//!
//! # fn main() -> design_compare::Result<()> {
//! let pipeline = Pipeline::new(Config::default())?;
//!
//! let request = ComparisonRequest::new("design.png", "screenshot.png").with_output("diff.png");
//! let result = pipeline.compare(&request)?;
//! println!("{:.2}% of pixels differ", result.difference_percentage);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compare;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod server;

pub use compare::{Comparison, DiffOptions};
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{CompareDesign, ComparisonRequest, ComparisonResult, Config, DiffImage, Pipeline};
pub use server::DesignCompareServer;
