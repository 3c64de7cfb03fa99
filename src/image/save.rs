//! Image encoding and saving utilities.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};

use super::Raster;

/// Encode a raster and write it to `path`.
///
/// The container format follows the path's extension, falling back to PNG
/// when the extension is missing or unknown. JPEG output drops the alpha
/// channel and uses `quality` (1-100); other formats ignore it.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the raster cannot be encoded and
/// [`Error::WriteFailed`] on any filesystem error.
pub fn save_image<P: AsRef<Path>>(raster: &Raster, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let bytes = encode(raster, format, quality)?;

    std::fs::write(path, bytes).map_err(|source| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode a raster as PNG and return it as standard padded base64.
///
/// # Errors
///
/// Returns [`Error::Encode`] if PNG encoding fails.
pub fn encode_base64_png(raster: &Raster) -> Result<String> {
    let bytes = encode(raster, ImageFormat::Png, 100)?;
    Ok(STANDARD.encode(bytes))
}

fn encode(raster: &Raster, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(raster.clone()).to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|source| Error::Encode { source })?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Tiff | ImageFormat::Bmp
        | ImageFormat::Gif => {
            raster
                .write_to(&mut Cursor::new(&mut bytes), format)
                .map_err(|source| Error::Encode { source })?;
        }
        _ => {
            raster
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|source| Error::Encode { source })?;
        }
    }

    Ok(bytes)
}
