//! Image loading, encoding, and saving utilities.

mod load;
mod save;

pub use load::{decode_image, load_image, read_image_bytes};
pub use save::{encode_base64_png, save_image};

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// Decoded image: width, height, and interleaved RGBA bytes.
/// The buffer always holds exactly `width * height * 4` bytes.
pub type Raster = RgbaImage;

/// Number of channels in a decoded raster.
pub const RGBA_CHANNELS: usize = 4;

/// Formats enabled when no explicit list is configured.
pub const DEFAULT_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Tiff,
    ImageFormat::Bmp,
];

/// Parse a comma-separated format list such as `png,jpeg,webp`.
///
/// # Errors
///
/// Returns an error if a name is not a known format or the list is empty.
pub fn parse_formats(list: &str) -> Result<Vec<ImageFormat>> {
    let mut formats = Vec::new();

    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let format = ImageFormat::from_extension(name.to_ascii_lowercase())
            .ok_or_else(|| Error::invalid("formats", format!("unknown image format '{name}'")))?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }

    if formats.is_empty() {
        return Err(Error::invalid("formats", "at least one format is required"));
    }

    Ok(formats)
}

/// Short lowercase name for a format, as accepted by [`parse_formats`].
#[must_use]
pub fn format_name(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let formats = parse_formats("png, JPG,jpeg,webp").unwrap();
        assert_eq!(
            formats,
            vec![ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP]
        );
    }

    #[test]
    fn test_parse_formats_rejects_unknown() {
        assert!(parse_formats("png,heic").is_err());
        assert!(parse_formats(" , ").is_err());
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name(ImageFormat::Png), "png");
        assert_eq!(format_name(ImageFormat::Jpeg), "jpg");
    }
}
