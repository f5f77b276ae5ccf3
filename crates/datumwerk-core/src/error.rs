// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Datumwerk.
//
// A candidate failing date validation is NOT an error — the date pipeline
// reports rejection as data (`false` / `None`). These variants cover the I/O
// collaborators only.

use thiserror::Error;

/// Top-level error type for all Datumwerk operations.
#[derive(Debug, Error)]
pub enum DatumwerkError {
    // -- Ingestion errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("no text could be extracted: {0}")]
    NoTextContent(String),

    // -- Network --
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("outcome notification failed: {0}")]
    Notify(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DatumwerkError>;
