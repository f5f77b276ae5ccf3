// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime settings for a Datumwerk check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Endpoint that receives the JSON outcome report, if any.
    pub notify_url: Option<String>,
    /// Directory containing the OCR model files (`None` → ocrs cache default).
    pub ocr_model_dir: Option<PathBuf>,
    /// Whether the OCR fallback stage may run at all.
    pub ocr_enabled: bool,
    /// How many characters of extracted text to echo as a preview.
    pub preview_chars: usize,
    /// Where to persist the full extracted text, if anywhere.
    pub save_text_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notify_url: None,
            ocr_model_dir: None,
            ocr_enabled: true,
            preview_chars: 500,
            save_text_path: None,
        }
    }
}
