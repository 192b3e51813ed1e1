use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Converts single image files into JPEG.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JpegConverter {
    quality: u8,
    dry_run: bool,
}

impl JpegConverter {
    pub(crate) const fn new(quality: u8, dry_run: bool) -> Self {
        Self { quality, dry_run }
    }

    /// Decodes `source`, flattens it to RGB and writes it to `output` as JPEG.
    ///
    /// The image format is detected from the file content, not its extension.
    /// In dry run mode the JPEG is encoded in memory and then discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the quality is outside 1..=100, the file cannot be
    /// read or decoded, or the JPEG cannot be encoded or written.
    pub(crate) fn convert_file(&self, source: &Path, output: &Path) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(Error::InvalidQuality {
                quality: self.quality,
            });
        }

        let rgb = load_rgb(source)?;
        let jpeg = encode_jpeg(&rgb, self.quality, output)?;

        if self.dry_run {
            trace!("Dry run, discarding {} bytes for {}", jpeg.len(), output.display());
            return Ok(());
        }

        fs::write(output, &jpeg).map_err(|e| Error::io(output, e))?;

        debug!(
            "Wrote {}x{} JPEG ({} bytes) to {}",
            rgb.width(),
            rgb.height(),
            jpeg.len(),
            output.display()
        );

        Ok(())
    }
}

/// Opens and decodes an image, converting it to 8-bit RGB.
///
/// JPEG has no alpha channel or palette, so those are dropped here.
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?;

    trace!("Detected format {:?} for {}", reader.format(), path.display());

    let image = reader
        .decode()
        .map_err(|e| Error::from_image_read(path, e))?;

    Ok(image.to_rgb8())
}

fn encode_jpeg(rgb: &RgbImage, quality: u8, output: &Path) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| Error::from_image_write(output, e))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use image::{DynamicImage, ImageFormat, LumaA, Rgba, RgbaImage};

    fn write_png(path: &Path, image: DynamicImage) {
        image.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 8) as u8, (y * 8) as u8, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_converts_png_to_jpeg() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("photo.png");
        write_png(source.path(), gradient(16, 8));
        let output = temp.child("photo.jpg");

        JpegConverter::new(50, false)
            .convert_file(source.path(), output.path())
            .unwrap();

        let decoded = image::open(output.path()).unwrap();
        let bytes = fs::read(output.path()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_format_detected_from_content() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("misnamed.txt");
        write_png(source.path(), gradient(4, 4));
        let output = temp.child("misnamed.jpg");

        JpegConverter::new(75, false)
            .convert_file(source.path(), output.path())
            .unwrap();

        assert!(output.path().exists());
    }

    #[test]
    fn test_alpha_is_flattened() {
        let temp = assert_fs::TempDir::new().unwrap();

        let rgba = temp.child("rgba.png");
        write_png(
            rgba.path(),
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0]))),
        );
        let gray = temp.child("gray.png");
        write_png(
            gray.path(),
            DynamicImage::ImageLumaA8(image::ImageBuffer::from_pixel(3, 3, LumaA([200u8, 100]))),
        );

        let converter = JpegConverter::new(90, false);
        for (source, name) in [(rgba.path(), "rgba.jpg"), (gray.path(), "gray.jpg")] {
            let output = temp.child(name);
            converter.convert_file(source, output.path()).unwrap();
            let decoded = image::open(output.path()).unwrap();
            assert_eq!(decoded.color().channel_count(), 3);
        }
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("broken.png");
        source.write_binary(b"\x89PNG\r\n\x1a\nthis is not a png").unwrap();
        let output = temp.child("broken.jpg");

        let err = JpegConverter::new(50, false)
            .convert_file(source.path(), output.path())
            .unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
        assert!(!output.path().exists());
    }

    #[test]
    fn test_garbage_with_image_extension_is_decode_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("a.PNG");
        source.write_binary(b"x").unwrap();

        let err = JpegConverter::new(50, false)
            .convert_file(source.path(), temp.child("a.jpg").path())
            .unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert!(!err.is_io());
    }

    #[test]
    fn test_text_file_is_decode_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("notes.txt");
        source.write_str("just some notes").unwrap();

        let err = JpegConverter::new(50, false)
            .convert_file(source.path(), temp.child("notes.jpg").path())
            .unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_out_of_range_quality() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("photo.png");
        write_png(source.path(), gradient(2, 2));

        for quality in [0, 101] {
            let err = JpegConverter::new(quality, false)
                .convert_file(source.path(), temp.child("photo.jpg").path())
                .unwrap_err();
            assert!(err.is_invalid_quality());
        }
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("photo.png");
        write_png(source.path(), gradient(32, 32));
        let low = temp.child("low.jpg");
        let high = temp.child("high.jpg");

        JpegConverter::new(5, false).convert_file(source.path(), low.path()).unwrap();
        JpegConverter::new(100, false).convert_file(source.path(), high.path()).unwrap();

        let low_len = fs::metadata(low.path()).unwrap().len();
        let high_len = fs::metadata(high.path()).unwrap().len();
        assert!(low_len < high_len);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("photo.png");
        write_png(source.path(), gradient(2, 2));
        let output = temp.child("photo.jpg");

        JpegConverter::new(50, true)
            .convert_file(source.path(), output.path())
            .unwrap();

        assert!(!output.path().exists());
    }

    #[test]
    fn test_missing_output_dir_is_io_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("photo.png");
        write_png(source.path(), gradient(2, 2));

        let err = JpegConverter::new(50, false)
            .convert_file(source.path(), temp.child("missing/photo.jpg").path())
            .unwrap_err();

        assert!(err.is_io());
    }
}
