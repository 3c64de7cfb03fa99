//! Image loading utilities.

use std::path::Path;

use image::ImageFormat;

use crate::error::{Error, Result};

use super::{Raster, format_name};

/// Load an image from disk and decode it to an RGBA raster.
///
/// The format is detected from the file content, never from the extension,
/// and must be one of `formats`. Sources without an alpha channel come back
/// fully opaque.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the file cannot be read,
/// [`Error::UnsupportedFormat`] if its content is not an enabled format, and
/// [`Error::Decode`] if the content is recognized but corrupt.
pub fn load_image<P: AsRef<Path>>(path: P, formats: &[ImageFormat]) -> Result<Raster> {
    let path = path.as_ref();
    let bytes = read_image_bytes(path)?;
    decode_image(path, &bytes, formats)
}

/// Read the raw bytes of an image file without decoding them.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the path does not resolve to a readable file.
pub fn read_image_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();

    std::fs::read(path).map_err(|source| Error::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode bytes previously read from `path` into an RGBA raster.
///
/// `path` is only used for error messages and logging.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the content is not an enabled
/// format and [`Error::Decode`] if it is recognized but corrupt.
pub fn decode_image(path: &Path, bytes: &[u8], formats: &[ImageFormat]) -> Result<Raster> {
    let format = detect_format(bytes, formats).map_err(|reason| Error::UnsupportedFormat {
        path: path.to_path_buf(),
        reason,
    })?;

    tracing::debug!(
        "Decoding {} as {} ({} bytes)",
        path.display(),
        format_name(format),
        bytes.len()
    );

    let img = image::load_from_memory_with_format(bytes, format).map_err(|source| {
        Error::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(img.to_rgba8())
}

/// Sniff the format from the leading bytes and check it is enabled.
fn detect_format(bytes: &[u8], formats: &[ImageFormat]) -> std::result::Result<ImageFormat, String> {
    let format = image::guess_format(bytes)
        .map_err(|_| "content is not a recognized image format".to_string())?;

    if formats.contains(&format) {
        Ok(format)
    } else {
        let enabled: Vec<&str> = formats.iter().map(|f| format_name(*f)).collect();
        Err(format!(
            "{} images are not enabled (supported: {})",
            format_name(format),
            enabled.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;
    use crate::error::ErrorKind;
    use crate::image::DEFAULT_FORMATS;

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_image("/non/existent/file.png", &DEFAULT_FORMATS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_text_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, "This is not an image file").unwrap();

        let err = load_image(&path, &DEFAULT_FORMATS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_format_detected_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actually-a-jpeg.png");
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([10, 200, 30])));
        std::fs::write(&path, encode(&img, ImageFormat::Jpeg)).unwrap();

        let raster = load_image(&path, &DEFAULT_FORMATS).unwrap();
        assert_eq!(raster.dimensions(), (8, 6));
    }

    #[test]
    fn test_disabled_format_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.jpg");
        let img = DynamicImage::new_rgb8(4, 4);
        std::fs::write(&path, encode(&img, ImageFormat::Jpeg)).unwrap();

        let err = load_image(&path, &[ImageFormat::Png]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("supported: png"));
    }

    #[test]
    fn test_alpha_is_synthesized_as_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        std::fs::write(&path, encode(&img, ImageFormat::Png)).unwrap();

        let raster = load_image(&path, &DEFAULT_FORMATS).unwrap();
        assert_eq!(raster.as_raw().len(), 3 * 2 * 4);
        assert!(raster.pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn test_truncated_png_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.png");
        let bytes = encode(&DynamicImage::new_rgb8(16, 16), ImageFormat::Png);
        std::fs::write(&path, &bytes[..24]).unwrap();

        let err = load_image(&path, &DEFAULT_FORMATS).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_read_does_not_inspect_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "This is not an image file").unwrap();

        let bytes = read_image_bytes(&path).unwrap();
        assert_eq!(bytes, b"This is not an image file");

        let err = decode_image(&path, &bytes, &DEFAULT_FORMATS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("notes.png"));
    }
}
