// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction cascade — turns the raw bytes of any supported document into a
// single text blob with provenance.
//
// PDFs try their text layer first; when it comes back empty or
// whitespace-only (scanned documents), the embedded page images are run
// through the cleanup pipeline and OCR. Standalone images go straight to
// cleanup + OCR. Per-page OCR output is merged with newline separators.

use datumwerk_core::error::DatumwerkError;
use datumwerk_core::types::{DocumentKind, ExtractedText, ExtractionMethod};
use image::DynamicImage;
use tracing::{info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::pdf::images::extract_page_images;
use crate::pdf::reader::PdfReader;
#[cfg(feature = "ocr")]
use crate::scan::prepare::ScanCleaner;

/// Extracts text from documents, with an optional OCR fallback stage.
pub struct DocumentExtractor {
    #[cfg(feature = "ocr")]
    ocr: Option<crate::scan::ocr::OcrEngine>,
}

impl DocumentExtractor {
    /// Extractor with no OCR stage: PDFs yield their text layer only, and
    /// standalone images cannot be processed.
    pub fn text_layer_only() -> Self {
        Self {
            #[cfg(feature = "ocr")]
            ocr: None,
        }
    }

    /// Extractor with an OCR fallback engine.
    #[cfg(feature = "ocr")]
    pub fn with_ocr(engine: crate::scan::ocr::OcrEngine) -> Self {
        Self { ocr: Some(engine) }
    }

    /// Extract text from document bytes of the given kind.
    pub fn extract(&self, data: &[u8], kind: DocumentKind) -> Result<ExtractedText, DatumwerkError> {
        match kind {
            DocumentKind::Pdf => self.extract_pdf(data),
            _ => self.extract_image(data),
        }
    }

    /// Extract text from a PDF: text layer first, OCR fallback second.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn extract_pdf(&self, data: &[u8]) -> Result<ExtractedText, DatumwerkError> {
        let reader = PdfReader::from_bytes(data)?;
        let page_count = reader.page_count();

        let text = reader.extract_text();
        if !text.trim().is_empty() {
            info!(page_count, chars = text.len(), "Text layer extraction succeeded");
            return Ok(ExtractedText::new(
                text,
                ExtractionMethod::TextLayer,
                page_count,
            ));
        }

        info!("Empty text layer — falling back to OCR on embedded page images");
        let images = extract_page_images(&reader);
        if images.is_empty() {
            return Err(DatumwerkError::NoTextContent(
                "PDF has neither a text layer nor decodable page images".into(),
            ));
        }

        let mut merged = String::new();
        let mut recognized = 0usize;
        for (index, image) in images.iter().enumerate() {
            match self.run_ocr(image) {
                Ok(page_text) => {
                    recognized += 1;
                    if !merged.is_empty() {
                        merged.push('\n');
                    }
                    merged.push_str(page_text.trim_end());
                }
                Err(DatumwerkError::OcrError(detail)) if recognized > 0 => {
                    // One bad page must not discard the pages already read.
                    warn!(page_index = index, %detail, "OCR failed for page, skipping");
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            images = images.len(),
            recognized,
            chars = merged.len(),
            "OCR fallback complete"
        );
        Ok(ExtractedText::new(
            merged,
            ExtractionMethod::EmbeddedImageOcr,
            recognized,
        ))
    }

    /// Extract text from a standalone image via cleanup + OCR.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn extract_image(&self, data: &[u8]) -> Result<ExtractedText, DatumwerkError> {
        let image = ImageProcessor::from_bytes(data)?.into_dynamic();
        let text = self.run_ocr(&image)?;
        Ok(ExtractedText::new(text, ExtractionMethod::ImageOcr, 1))
    }

    /// Clean one image and run it through the OCR engine.
    fn run_ocr(&self, image: &DynamicImage) -> Result<String, DatumwerkError> {
        #[cfg(feature = "ocr")]
        if let Some(engine) = &self.ocr {
            let cleaned = ScanCleaner::from_dynamic(image.clone()).prepare_for_ocr();
            return engine.recognize_text(&cleaned);
        }

        let _ = image;
        Err(DatumwerkError::OcrError(
            "document requires OCR but no OCR engine is configured".into(),
        ))
    }
}
