// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outcome notification — POSTs the JSON report of a check run to an
// external endpoint. Delivery failure is the caller's decision to ignore;
// it never changes the verdict.

use chrono::{DateTime, Utc};
use datumwerk_core::error::DatumwerkError;
use datumwerk_core::types::{DocumentKind, ExtractedText, ExtractionMethod, InputSource};
use datumwerk_dates::{DateReport, Verdict};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// JSON body sent to the notification endpoint (also the `--json` output).
#[derive(Debug, Serialize)]
pub struct OutcomePayload {
    /// Path or URL the document came from.
    pub source: String,
    /// MIME type of the checked document.
    pub mime_type: &'static str,
    /// SHA-256 of the document bytes, hex encoded.
    pub document_sha256: String,
    /// Which extraction stage produced the text.
    pub extraction_method: ExtractionMethod,
    /// Three-state outcome.
    pub verdict: Verdict,
    /// Every date-shaped candidate, in order of appearance.
    pub candidates: Vec<String>,
    /// Valid dates in ISO `YYYY-MM-DD` form.
    pub valid_dates: Vec<String>,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl OutcomePayload {
    pub fn new(
        source: &InputSource,
        kind: DocumentKind,
        document_sha256: &str,
        extracted: &ExtractedText,
        report: &DateReport,
    ) -> Self {
        Self {
            source: source.to_string(),
            mime_type: kind.mime_type(),
            document_sha256: document_sha256.to_string(),
            extraction_method: extracted.method,
            verdict: report.verdict(),
            candidates: report
                .candidates
                .iter()
                .map(|candidate| candidate.text.clone())
                .collect(),
            valid_dates: report
                .valid
                .iter()
                .map(|validated| validated.date.to_string())
                .collect(),
            checked_at: Utc::now(),
        }
    }
}

/// POST the outcome report to `route`. 4xx/5xx answers are errors.
#[instrument(skip_all, fields(route = %route))]
pub async fn post_outcome(route: &str, payload: &OutcomePayload) -> Result<(), DatumwerkError> {
    info!("Notifying outcome endpoint");

    let client = reqwest::Client::new();
    let response = client
        .post(route)
        .json(payload)
        .send()
        .await
        .map_err(|err| DatumwerkError::Notify(format!("POST {route} failed: {err}")))?;

    response
        .error_for_status()
        .map_err(|err| DatumwerkError::Notify(format!("{route} rejected the report: {err}")))?;

    debug!("Notification delivered");
    Ok(())
}
