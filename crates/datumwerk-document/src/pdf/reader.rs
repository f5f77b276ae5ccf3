// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — opens existing PDF documents and recovers their text layer,
// page by page, using the `lopdf` crate.

use std::path::Path;

use datumwerk_core::error::DatumwerkError;
use lopdf::Document;
use tracing::{debug, info, instrument, warn};

/// Reads existing PDF files and extracts their text layer.
///
/// Extraction is isolated per page: a page whose content stream fails to
/// parse is skipped with a warning. Scanned or damaged pages must never
/// abort the whole document — the OCR fallback can still recover them.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatumwerkError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            DatumwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DatumwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            DatumwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Borrow the underlying lopdf document (used by the page image harvest).
    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    // -- Text layer -----------------------------------------------------------

    /// Extract the text layer of every page, merged with newline separators.
    ///
    /// Pages are visited in page-number order. A page that fails extraction
    /// contributes nothing and the remaining pages are still visited. A
    /// document with no text layer yields an empty or whitespace-only string;
    /// the caller decides whether to fall back to OCR.
    #[instrument(skip(self))]
    pub fn extract_text(&self) -> String {
        let pages = self.document.get_pages();
        let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
        page_numbers.sort_unstable();

        let mut merged = String::new();
        let mut failed_pages = 0usize;

        for page_number in page_numbers {
            match self.document.extract_text(&[page_number]) {
                Ok(page_text) => {
                    if !merged.is_empty() {
                        merged.push('\n');
                    }
                    merged.push_str(page_text.trim_end());
                }
                Err(err) => {
                    failed_pages += 1;
                    warn!(page_number, %err, "Text extraction failed for page, skipping");
                }
            }
        }

        debug!(
            chars = merged.len(),
            failed_pages,
            "Text layer extraction complete"
        );
        merged
    }
}
