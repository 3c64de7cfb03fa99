//! Main design-to-implementation comparison pipeline.

use std::path::{Path, PathBuf};

use ::image::ImageFormat;

use crate::compare::{self, DiffOptions, validate_unit};
use crate::error::{Error, Result};
use crate::image::{self, DEFAULT_FORMATS};

use super::result::{ComparisonResult, package};

/// Configuration for the comparison pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Detection and drawing options; `diff.threshold` is the default
    /// threshold for requests that do not set one.
    pub diff: DiffOptions,

    /// Image formats the loader accepts, detected from file content.
    pub formats: Vec<ImageFormat>,

    /// JPEG quality (1-100) when the diff is written to a `.jpg` path.
    pub output_quality: u8,

    /// Largest inline (base64) diff returned when no output path is given.
    pub max_inline_bytes: usize,
}

/// Default cap on the inline diff encoding: 8 MiB of base64 text.
pub const DEFAULT_MAX_INLINE_BYTES: usize = 8 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            diff: DiffOptions::default(),
            formats: DEFAULT_FORMATS.to_vec(),
            output_quality: 95,
            max_inline_bytes: DEFAULT_MAX_INLINE_BYTES,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        self.diff.validate()?;

        if self.formats.is_empty() {
            return Err(Error::invalid("formats", "at least one format is required"));
        }

        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::invalid("output_quality", "must be between 1 and 100"));
        }

        if self.max_inline_bytes == 0 {
            return Err(Error::invalid("max_inline_bytes", "must be greater than 0"));
        }

        Ok(())
    }
}

/// One comparison call: two inputs, an optional diff destination and an
/// optional threshold override.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub design_path: PathBuf,
    pub implementation_path: PathBuf,
    pub output_diff_path: Option<PathBuf>,
    pub threshold: Option<f64>,
}

impl ComparisonRequest {
    pub fn new(design_path: impl Into<PathBuf>, implementation_path: impl Into<PathBuf>) -> Self {
        Self {
            design_path: design_path.into(),
            implementation_path: implementation_path.into(),
            output_diff_path: None,
            threshold: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_diff_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// The single capability transports need: run a comparison request.
pub trait CompareDesign: Send + Sync {
    /// Compare the design against the implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be loaded, the sizes differ, a
    /// parameter is out of range, or the diff cannot be written.
    fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResult>;

    /// Image formats this implementation accepts.
    fn supported_formats(&self) -> &[ImageFormat];
}

/// Stateless comparison pipeline: load, load, compare, package.
///
/// Holds only configuration, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::debug!("Initializing pipeline with config: {config:?}");

        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Compare two image files.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails; see [`CompareDesign::compare`].
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        design_path: P,
        implementation_path: Q,
        output_path: Option<&Path>,
        threshold: Option<f64>,
    ) -> Result<ComparisonResult> {
        let design_path = design_path.as_ref();
        let implementation_path = implementation_path.as_ref();

        let options = match threshold {
            Some(threshold) => {
                validate_unit("threshold", threshold)?;
                DiffOptions {
                    threshold,
                    ..self.config.diff.clone()
                }
            }
            None => self.config.diff.clone(),
        };

        tracing::info!(
            "Comparing {} against {} (threshold {})",
            design_path.display(),
            implementation_path.display(),
            options.threshold
        );

        // Both files must exist before either is decoded.
        let design_bytes = image::read_image_bytes(design_path)?;
        let implementation_bytes = image::read_image_bytes(implementation_path)?;

        let design = image::decode_image(design_path, &design_bytes, &self.config.formats)?;
        let implementation =
            image::decode_image(implementation_path, &implementation_bytes, &self.config.formats)?;

        let comparison = compare::compare(&design, &implementation, &options)?;
        let total_pixels = u64::from(design.width()) * u64::from(design.height());

        let result = package(
            total_pixels,
            comparison.different_pixels,
            &comparison.diff,
            output_path,
            self.config.output_quality,
            self.config.max_inline_bytes,
        )?;

        tracing::info!(
            "Comparison complete: {}/{} pixels differ ({:.2}%)",
            result.different_pixels,
            result.total_pixels,
            result.difference_percentage
        );

        Ok(result)
    }
}

impl CompareDesign for Pipeline {
    fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResult> {
        self.process(
            &request.design_path,
            &request.implementation_path,
            request.output_diff_path.as_deref(),
            request.threshold,
        )
    }

    fn supported_formats(&self) -> &[ImageFormat] {
        &self.config.formats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            output_quality: 0,
            ..Config::default()
        };
        assert!(Pipeline::new(config).is_err());

        let config = Config {
            formats: Vec::new(),
            ..Config::default()
        };
        assert!(Pipeline::new(config).is_err());

        let config = Config {
            max_inline_bytes: 0,
            ..Config::default()
        };
        assert!(Pipeline::new(config).is_err());

        let config = Config {
            diff: DiffOptions {
                threshold: 2.0,
                ..DiffOptions::default()
            },
            ..Config::default()
        };
        assert!(Pipeline::new(config).is_err());
    }

    #[test]
    fn test_request_builder() {
        let request = ComparisonRequest::new("design.png", "impl.png")
            .with_output("diff.png")
            .with_threshold(0.3);

        assert_eq!(request.design_path, PathBuf::from("design.png"));
        assert_eq!(request.output_diff_path, Some(PathBuf::from("diff.png")));
        assert_eq!(request.threshold, Some(0.3));
    }
}
