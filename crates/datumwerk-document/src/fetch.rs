// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Remote document retrieval over HTTP(S).

use datumwerk_core::error::DatumwerkError;
use tracing::{debug, info, instrument};

/// Download a remote document and return its raw bytes.
///
/// Non-success HTTP statuses are errors — an HTML 404 page must never be fed
/// to the PDF or image decoders as if it were the document.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, DatumwerkError> {
    info!("Fetching remote document: {url}");

    let response = reqwest::get(url)
        .await
        .map_err(|err| DatumwerkError::Fetch(format!("request to {url} failed: {err}")))?;

    let response = response
        .error_for_status()
        .map_err(|err| DatumwerkError::Fetch(format!("{url} answered with an error: {err}")))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|err| DatumwerkError::Fetch(format!("reading body of {url} failed: {err}")))?;

    debug!(bytes = bytes.len(), "Fetch complete");
    Ok(bytes.to_vec())
}
