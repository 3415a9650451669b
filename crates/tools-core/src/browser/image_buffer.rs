//! Image buffer wrapper for rendered pages
//!
//! Wraps `image::DynamicImage` with the transformations the screenshot
//! pipeline needs: decoding the browser's PNG, cropping a clip region,
//! scaling, and shrinking oversized pages to a maximum edge length.
//!
//! # Examples
//!
//! ```
//! use tools_core::{browser::ImageBuffer, model::Region};
//!
//! let img = ImageBuffer::from_test_pattern(1920, 1080);
//!
//! let scaled = img.scale(0.5).unwrap();
//! assert_eq!(scaled.dimensions(), (960, 540));
//!
//! let cropped = scaled.crop(Region::new(100, 100, 800, 400)).unwrap();
//! assert_eq!(cropped.dimensions(), (800, 400));
//! ```

use image::GenericImageView;

use crate::{
    error::{CaptureError, CaptureResult},
    model::Region,
};

/// Wrapper around `image::DynamicImage` with transformation methods
///
/// All transformation methods return new `ImageBuffer` instances, leaving
/// the original unchanged.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    inner: image::DynamicImage,
}

impl ImageBuffer {
    /// Creates a new ImageBuffer from a DynamicImage
    pub fn new(image: image::DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Decodes PNG bytes as written by the browser's `--screenshot` flag
    pub fn from_png_bytes(bytes: &[u8]) -> CaptureResult<Self> {
        if bytes.is_empty() {
            return Err(CaptureError::ImageError("browser produced an empty file".to_string()));
        }
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| CaptureError::ImageError(format!("failed to decode screenshot: {e}")))?;
        Ok(Self::new(image))
    }

    /// Scales the image by the given factor
    ///
    /// Uses Lanczos3 filtering. The factor is clamped to 0.1..=2.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use tools_core::browser::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_test_pattern(1920, 1080);
    /// let double = img.scale(2.0).unwrap();
    /// assert_eq!(double.dimensions(), (3840, 2160));
    /// ```
    pub fn scale(&self, factor: f32) -> CaptureResult<Self> {
        let factor = factor.clamp(0.1, 2.0);

        let (width, height) = self.dimensions();
        let new_width = ((width as f32) * factor) as u32;
        let new_height = ((height as f32) * factor) as u32;

        if new_width == width && new_height == height {
            return Ok(self.clone());
        }

        Ok(self.resize_exact(new_width.max(1), new_height.max(1)))
    }

    /// Shrinks the image so neither edge exceeds `max_dimension`
    ///
    /// Aspect ratio is preserved. Images already within the limit are
    /// returned unchanged; images are never enlarged.
    pub fn fit_within(&self, max_dimension: u32) -> CaptureResult<Self> {
        if max_dimension == 0 {
            return Err(CaptureError::invalid("max_dimension", "must be greater than 0"));
        }

        let (width, height) = self.dimensions();
        let longest = width.max(height);
        if longest <= max_dimension {
            return Ok(self.clone());
        }

        let ratio = max_dimension as f64 / longest as f64;
        let new_width = ((width as f64 * ratio).round() as u32).clamp(1, max_dimension);
        let new_height = ((height as f64 * ratio).round() as u32).clamp(1, max_dimension);
        Ok(self.resize_exact(new_width, new_height))
    }

    fn resize_exact(&self, width: u32, height: u32) -> Self {
        Self::new(self.inner.resize_exact(
            width,
            height,
            image::imageops::FilterType::Lanczos3,
        ))
    }

    /// Crops the image to the specified region
    ///
    /// The region must have a non-zero size and lie within the image bounds.
    pub fn crop(&self, region: Region) -> CaptureResult<Self> {
        let (img_width, img_height) = self.dimensions();

        if !region.fits_within(img_width, img_height) {
            return Err(CaptureError::invalid(
                "clip",
                format!(
                    "region {}x{} at ({}, {}) does not fit the rendered page ({}x{})",
                    region.width, region.height, region.x, region.y, img_width, img_height
                ),
            ));
        }

        Ok(Self::new(self.inner.crop_imm(region.x, region.y, region.width, region.height)))
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Converts the image to RGBA8 format
    pub fn to_rgba8(&self) -> image::RgbaImage {
        self.inner.to_rgba8()
    }

    /// Converts the image to RGB8 format, dropping any alpha channel
    pub fn to_rgb8(&self) -> image::RgbImage {
        self.inner.to_rgb8()
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// The pattern is a vertical gradient from blue (top) to cyan (bottom),
    /// standing in for a rendered page when no browser is involved.
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        use image::{ImageBuffer as ImgBuf, Rgba};

        let start_color = Rgba([0u8, 0u8, 255u8, 255u8]);
        let end_color = Rgba([0u8, 255u8, 255u8, 255u8]);

        let img = ImgBuf::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgba([
                (start_color[0] as f32 * (1.0 - ratio) + end_color[0] as f32 * ratio) as u8,
                (start_color[1] as f32 * (1.0 - ratio) + end_color[1] as f32 * ratio) as u8,
                (start_color[2] as f32 * (1.0 - ratio) + end_color[2] as f32 * ratio) as u8,
                255,
            ])
        });

        Self::new(image::DynamicImage::ImageRgba8(img))
    }

    /// Returns a reference to the inner DynamicImage
    pub fn inner(&self) -> &image::DynamicImage {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        ImageBuffer::from_test_pattern(width, height)
            .inner()
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_from_png_bytes_roundtrip_dimensions() {
        let img = ImageBuffer::from_png_bytes(&png_bytes(64, 48)).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn test_from_png_bytes_rejects_garbage() {
        let err = ImageBuffer::from_png_bytes(b"<html>not a png</html>").unwrap_err();
        assert!(matches!(err, CaptureError::ImageError(_)));

        let err = ImageBuffer::from_png_bytes(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_scale_valid_factors() {
        let img = ImageBuffer::from_test_pattern(1000, 1000);

        assert_eq!(img.scale(0.5).unwrap().dimensions(), (500, 500));
        assert_eq!(img.scale(1.0).unwrap().dimensions(), (1000, 1000));
        assert_eq!(img.scale(1.5).unwrap().dimensions(), (1500, 1500));
    }

    #[test]
    fn test_scale_clamps_factor() {
        let img = ImageBuffer::from_test_pattern(100, 100);

        assert_eq!(img.scale(0.01).unwrap().dimensions(), (10, 10));
        assert_eq!(img.scale(3.0).unwrap().dimensions(), (200, 200));
    }

    #[test]
    fn test_fit_within_shrinks_long_pages() {
        let img = ImageBuffer::from_test_pattern(1280, 4000);

        let fitted = img.fit_within(2000).unwrap();
        assert_eq!(fitted.dimensions(), (640, 2000));
    }

    #[test]
    fn test_fit_within_never_enlarges() {
        let img = ImageBuffer::from_test_pattern(800, 600);

        let fitted = img.fit_within(4096).unwrap();
        assert_eq!(fitted.dimensions(), (800, 600));
        assert!(img.fit_within(0).is_err());
    }

    #[test]
    fn test_crop_valid_region() {
        let img = ImageBuffer::from_test_pattern(1280, 800);

        let cropped = img.crop(Region::new(100, 50, 640, 400)).unwrap();
        assert_eq!(cropped.dimensions(), (640, 400));

        let full = img.crop(Region::new(0, 0, 1280, 800)).unwrap();
        assert_eq!(full.dimensions(), (1280, 800));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let img = ImageBuffer::from_test_pattern(1280, 800);

        let err = img.crop(Region::new(1200, 0, 200, 100)).unwrap_err();
        assert!(err.to_string().contains("clip"));

        assert!(img.crop(Region::new(0, 0, 0, 100)).is_err());
    }

    #[test]
    fn test_test_pattern_gradient() {
        let img = ImageBuffer::from_test_pattern(10, 100);
        let rgba = img.to_rgba8();

        assert_eq!(rgba.get_pixel(0, 0)[2], 255);
        assert!(rgba.get_pixel(0, 99)[1] > 200);
    }
}
