// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan cleanup pipeline — grayscale conversion, contrast stretching, Otsu
// binarization, and border trimming, in the fixed order that text
// recognition benefits from.

use image::{DynamicImage, GrayImage, Luma};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;

/// Cleans scanned document images before text recognition.
///
/// Wraps a working image and exposes the individual cleanup steps plus the
/// recommended single-call pipeline, [`ScanCleaner::prepare_for_ocr`].
pub struct ScanCleaner {
    /// The working image.
    image: DynamicImage,
}

impl ScanCleaner {
    /// Wrap an existing `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Consume the cleaner and return the underlying image.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Global binarization using a threshold computed via Otsu's method.
    ///
    /// Pixels darker than the threshold become black, the rest white. Works
    /// well on documents, whose histograms are strongly bimodal (ink vs
    /// paper).
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let gray = self.image.to_luma8();
        let threshold = otsu_threshold(&gray);
        debug!(threshold, "Otsu threshold computed");

        let (width, height) = gray.dimensions();
        let mut output = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let value = gray.get_pixel(x, y).0[0];
                let binary = if value < threshold { 0u8 } else { 255u8 };
                output.put_pixel(x, y, Luma([binary]));
            }
        }

        Self {
            image: DynamicImage::ImageLuma8(output),
        }
    }

    /// Run the full cleanup pipeline:
    ///
    /// 1. Convert to grayscale
    /// 2. Stretch contrast to the full range
    /// 3. Otsu binarization
    /// 4. Trim uniform borders
    ///
    /// This is the recommended single call for pages headed to OCR.
    #[instrument(skip(self))]
    pub fn prepare_for_ocr(self) -> DynamicImage {
        info!("Running scan cleanup pipeline");

        let processed = ImageProcessor::from_dynamic(self.image)
            .grayscale()
            .stretch_contrast()
            .into_dynamic();

        let binarized = Self::from_dynamic(processed).binarize_otsu();

        ImageProcessor::from_dynamic(binarized.into_dynamic())
            .trim_borders()
            .into_dynamic()
    }
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Finds the threshold that maximises the between-class variance of the
/// black and white pixel groups.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let mut sum_total: f64 = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_separates_bimodal_histogram() {
        // Half dark (40), half light (200): the threshold must land between.
        let img = GrayImage::from_fn(100, 2, |x, _| {
            if x < 50 { Luma([40u8]) } else { Luma([200u8]) }
        });
        let threshold = otsu_threshold(&img);
        assert!((40..=200).contains(&threshold), "threshold {threshold}");
    }

    #[test]
    fn binarize_produces_only_black_and_white() {
        let img = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 3 + y * 2) % 251) as u8]));
        let cleaner = ScanCleaner::from_dynamic(DynamicImage::ImageLuma8(img));

        let out = cleaner.binarize_otsu().into_dynamic().to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn pipeline_keeps_content_block() {
        // Light page, dark text block with margins: the pipeline should
        // binarize and crop roughly to the block.
        let mut img = GrayImage::from_pixel(200, 120, Luma([220u8]));
        for y in 30..60 {
            for x in 40..160 {
                img.put_pixel(x, y, Luma([35u8]));
            }
        }

        let cleaned = ScanCleaner::from_dynamic(DynamicImage::ImageLuma8(img)).prepare_for_ocr();
        assert_eq!(cleaned.width(), 120);
        assert_eq!(cleaned.height(), 30);
    }

    #[test]
    fn empty_histogram_default_threshold() {
        let img = GrayImage::new(0, 0);
        assert_eq!(otsu_threshold(&img), 128);
    }
}
