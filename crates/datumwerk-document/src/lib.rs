// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// datumwerk-document — Document ingestion for the Datumwerk date engine.
//
// Provides PDF reading (text layer, embedded page images), image processing
// (grayscale, contrast stretch, border trimming), a scan cleanup pipeline
// feeding OCR, remote document fetching, and the extraction cascade that
// turns any supported input into a single text blob.

pub mod extract;
pub mod fetch;
pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary types so callers can use `datumwerk_document::PdfReader` etc.
pub use extract::DocumentExtractor;
pub use image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use scan::prepare::ScanCleaner;

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrConfig, OcrEngine};
