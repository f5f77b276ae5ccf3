// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Datumwerk date discovery engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl DocumentKind {
    /// MIME type string, carried in the outcome notification payload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer document kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Infer document kind from a local path or a URL.
    ///
    /// For URLs the query and fragment are stripped before looking at the
    /// extension, so `https://host/scan.pdf?dl=1` classifies as PDF.
    pub fn from_path_or_url(source: &str) -> Option<Self> {
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let (_, ext) = path.rsplit_once('.')?;
        if ext.contains('/') {
            // The last dot belongs to a directory component, not a filename.
            return None;
        }
        Self::from_extension(ext)
    }
}

/// Where an input document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// A document fetched over HTTP(S).
    Remote(String),
}

impl InputSource {
    /// Classify a raw argument as a URL or a local path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// How the text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Read directly from the PDF text layer.
    TextLayer,
    /// Recognised from the embedded page images of a scanned PDF.
    EmbeddedImageOcr,
    /// Recognised from a standalone image file.
    ImageOcr,
}

/// Text recovered from a document, with provenance and simple statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// The merged text of all pages/images, separated by newlines.
    pub content: String,
    /// Which extraction stage produced the text.
    pub method: ExtractionMethod,
    /// Number of pages (PDF) or images the text was merged from.
    pub segment_count: usize,
}

impl ExtractedText {
    pub fn new(content: String, method: ExtractionMethod, segment_count: usize) -> Self {
        Self {
            content,
            method,
            segment_count,
        }
    }

    /// `true` when no usable text was recovered (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension_case_insensitive() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("jpeg"), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::from_extension("docx"), None);
    }

    #[test]
    fn kind_from_url_strips_query_and_fragment() {
        assert_eq!(
            DocumentKind::from_path_or_url("https://host/x/scan.pdf?dl=1"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path_or_url("https://host/photo.JPG#page"),
            Some(DocumentKind::Jpeg)
        );
    }

    #[test]
    fn kind_from_path_without_extension_is_none() {
        assert_eq!(DocumentKind::from_path_or_url("/tmp/scan"), None);
        assert_eq!(DocumentKind::from_path_or_url("https://host/dir.d/file"), None);
    }

    #[test]
    fn source_classification() {
        assert_eq!(
            InputSource::parse("https://host/a.pdf"),
            InputSource::Remote("https://host/a.pdf".into())
        );
        assert_eq!(
            InputSource::parse("scans/a.pdf"),
            InputSource::Local(PathBuf::from("scans/a.pdf"))
        );
    }

    #[test]
    fn extracted_text_statistics() {
        let text = ExtractedText::new("two words\n".into(), ExtractionMethod::TextLayer, 1);
        assert!(!text.is_blank());
        assert_eq!(text.word_count(), 2);
        assert_eq!(text.char_count(), 10);

        let blank = ExtractedText::new("  \n \t".into(), ExtractionMethod::ImageOcr, 1);
        assert!(blank.is_blank());
    }
}
