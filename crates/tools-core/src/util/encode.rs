//! Image post-processing and encoding
//!
//! The browser always hands back a PNG of the full viewport. Everything the
//! caller asked for beyond that happens here, in a fixed order:
//!
//! 1. crop to `region`, when given (viewport pixel coordinates)
//! 2. resize by `scale`
//! 3. downscale to `max_dimension`, never enlarging
//! 4. encode as PNG, JPEG or WebP
//!
//! # Format Support
//!
//! - **PNG**: lossless; quality picks the compression level
//! - **JPEG**: lossy, quality 1-100, alpha dropped
//! - **WebP**: lossless only in image 0.25, quality ignored
//!
//! # Examples
//!
//! ```
//! use tools_core::{
//!     browser::ImageBuffer,
//!     model::{CaptureOptions, ImageFormat},
//!     util::encode::render,
//! };
//!
//! let img = ImageBuffer::from_test_pattern(1280, 800);
//! let opts = CaptureOptions::builder().format(ImageFormat::Jpeg).scale(0.5).build();
//!
//! let encoded = render(&img, &opts).unwrap();
//! assert_eq!((encoded.width, encoded.height), (640, 400));
//! ```

use std::io::Cursor;

use image::{
    ImageEncoder,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
        webp::WebPEncoder,
    },
};

use crate::{
    browser::ImageBuffer,
    error::{CaptureError, CaptureResult},
    model::{CaptureOptions, ImageFormat},
};

/// An encoded screenshot ready to be written or returned
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes:  Vec<u8>,
    pub format: ImageFormat,
    pub width:  u32,
    pub height: u32,
}

/// Maps quality (0-100) to a PNG compression level
///
/// - 0-33: Fast
/// - 34-66: Default
/// - 67-100: Best
pub fn compression_type_from_quality(quality: u8) -> CompressionType {
    match quality {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Encodes an image as PNG at the given compression level
pub fn encode_png(buffer: &ImageBuffer, compression: CompressionType) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    encoder
        .write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| encoding_failed(ImageFormat::Png, e))?;

    Ok(output)
}

/// Encodes an image as JPEG
///
/// Quality is clamped to 1-100. The alpha channel is discarded since JPEG
/// cannot carry it.
///
/// # Examples
///
/// ```
/// use tools_core::{browser::ImageBuffer, util::encode::encode_jpeg};
///
/// let img = ImageBuffer::from_test_pattern(100, 100);
/// let low = encode_jpeg(&img, 30).unwrap();
/// let high = encode_jpeg(&img, 90).unwrap();
/// assert!(high.len() > low.len());
/// ```
pub fn encode_jpeg(buffer: &ImageBuffer, quality: u8) -> CaptureResult<Vec<u8>> {
    let quality = quality.clamp(1, 100);

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut output), quality);

    let rgb = buffer.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(CaptureError::invalid("dimensions", "image dimensions must be > 0"));
    }

    encoder
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| encoding_failed(ImageFormat::Jpeg, e))?;

    Ok(output)
}

/// Encodes an image as lossless WebP
pub fn encode_webp(buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder = WebPEncoder::new_lossless(Cursor::new(&mut output));

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    encoder
        .write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| encoding_failed(ImageFormat::Webp, e))?;

    Ok(output)
}

/// Encodes an image in the format and quality from `opts`
pub fn encode_image(buffer: &ImageBuffer, opts: &CaptureOptions) -> CaptureResult<Vec<u8>> {
    match opts.format {
        ImageFormat::Png => encode_png(buffer, compression_type_from_quality(opts.quality)),
        ImageFormat::Jpeg => encode_jpeg(buffer, opts.quality),
        ImageFormat::Webp => encode_webp(buffer),
    }
}

/// Applies crop, scale and size limit, then encodes
pub fn render(buffer: &ImageBuffer, opts: &CaptureOptions) -> CaptureResult<EncodedImage> {
    let mut image = match opts.region {
        Some(region) => buffer.crop(region)?,
        None => buffer.clone(),
    };

    if (opts.scale - 1.0).abs() > f32::EPSILON {
        image = image.scale(opts.scale)?;
    }

    if let Some(max_dimension) = opts.max_dimension {
        image = image.fit_within(max_dimension)?;
    }

    let bytes = encode_image(&image, opts)?;
    let (width, height) = image.dimensions();

    Ok(EncodedImage {
        bytes,
        format: opts.format,
        width,
        height,
    })
}

fn encoding_failed(format: ImageFormat, e: image::ImageError) -> CaptureError {
    CaptureError::EncodingFailed {
        format: format.as_str().to_string(),
        reason: e.to_string(),
    }
}
