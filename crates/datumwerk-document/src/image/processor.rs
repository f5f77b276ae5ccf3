// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — loading, grayscale conversion, contrast stretching, and
// border trimming. Operates on in-memory images using the `image` crate.

use datumwerk_core::error::DatumwerkError;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `ImageProcessor` wrapping the transformed image, enabling
/// method chaining.
///
/// ```ignore
/// let cleaned = ImageProcessor::from_bytes(&data)?
///     .grayscale()
///     .stretch_contrast()
///     .trim_borders()
///     .into_dynamic();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DatumwerkError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            DatumwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DatumwerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            DatumwerkError::ImageError(format!("failed to decode image: {err}"))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) ----------------------

    /// Convert the image to grayscale (luma).
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Stretch the intensity histogram so the darkest pixel maps to 0 and the
    /// brightest to 255 (automatic contrast).
    ///
    /// Faded photocopies and low-contrast camera scans gain a full dynamic
    /// range, which binarization and OCR both depend on. A uniform image
    /// (zero range) passes through unchanged.
    #[instrument(skip(self))]
    pub fn stretch_contrast(self) -> Self {
        let gray = self.image.to_luma8();

        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for pixel in gray.pixels() {
            let value = pixel.0[0];
            min = min.min(value);
            max = max.max(value);
        }

        if min >= max {
            debug!("Uniform image — contrast stretch is a no-op");
            return Self {
                image: DynamicImage::ImageLuma8(gray),
            };
        }

        info!(min, max, "Stretching contrast");
        let range = (max - min) as u32;
        let stretched = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let value = gray.get_pixel(x, y).0[0] as u32;
            let scaled = ((value - min as u32) * 255 + range / 2) / range;
            Luma([scaled as u8])
        });

        Self {
            image: DynamicImage::ImageLuma8(stretched),
        }
    }

    /// Crop away uniform borders, comparing every pixel against the top-left
    /// corner value with a small tolerance.
    ///
    /// Scanner beds and photographed pages leave large flat margins around
    /// the content; trimming them keeps OCR from wasting effort on them. An
    /// image that is entirely uniform, or whose content already reaches the
    /// borders, passes through unchanged.
    #[instrument(skip(self))]
    pub fn trim_borders(self) -> Self {
        const TOLERANCE: i16 = 16;

        let gray = self.image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return self;
        }

        let background = gray.get_pixel(0, 0).0[0] as i16;

        let mut min_x = width;
        let mut min_y = height;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for y in 0..height {
            for x in 0..width {
                let value = gray.get_pixel(x, y).0[0] as i16;
                if (value - background).abs() > TOLERANCE {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if min_x > max_x || min_y > max_y {
            debug!("No content distinct from the border — keeping image as-is");
            return self;
        }

        let crop_w = max_x - min_x + 1;
        let crop_h = max_y - min_y + 1;
        if crop_w == width && crop_h == height {
            return self;
        }

        info!(min_x, min_y, crop_w, crop_h, "Trimming borders");
        let cropped = self.image.crop_imm(min_x, min_y, crop_w, crop_h);
        Self { image: cropped }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, DatumwerkError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| DatumwerkError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), DatumwerkError> {
        self.image.save(path.as_ref()).map_err(|err| {
            DatumwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn contrast_stretch_expands_range() {
        // Mid-gray band from 100..=150 should stretch to the full range.
        let img = GrayImage::from_fn(51, 1, |x, _| Luma([100 + x as u8]));
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img)).stretch_contrast();

        let out = processor.into_dynamic().to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(50, 0).0[0], 255);
    }

    #[test]
    fn contrast_stretch_on_uniform_image_is_noop() {
        let img = GrayImage::from_pixel(10, 10, Luma([128u8]));
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img)).stretch_contrast();
        let out = processor.into_dynamic().to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn trim_borders_crops_to_content() {
        // White page with a dark 20x10 block at (30, 40).
        let mut img = GrayImage::from_pixel(100, 100, Luma([255u8]));
        for y in 40..50 {
            for x in 30..50 {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }

        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img)).trim_borders();
        assert_eq!(processor.width(), 20);
        assert_eq!(processor.height(), 10);
    }

    #[test]
    fn trim_borders_on_uniform_image_is_noop() {
        let img = GrayImage::from_pixel(32, 32, Luma([255u8]));
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img)).trim_borders();
        assert_eq!((processor.width(), processor.height()), (32, 32));
    }

    #[test]
    fn png_round_trip() {
        let img = GrayImage::from_pixel(4, 4, Luma([7u8]));
        let bytes = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .to_png_bytes()
            .unwrap();

        let reloaded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (4, 4));
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        let result = ImageProcessor::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(DatumwerkError::ImageError(_))));
    }

    #[test]
    fn save_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        let img = GrayImage::from_pixel(6, 3, Luma([42u8]));
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .save(&path)
            .unwrap();

        let reopened = ImageProcessor::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (6, 3));
    }
}
