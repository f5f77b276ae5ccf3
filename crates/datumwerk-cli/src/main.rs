// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Datumwerk — document date discovery CLI.
//
// Entry point. Initialises logging, resolves configuration (flags >
// environment > defaults), obtains the document bytes, runs the extraction
// cascade and the date pipeline, prints the three-state outcome, and
// optionally notifies an external endpoint.

mod notify;
mod output;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use datumwerk_core::{AppConfig, DatumwerkError, DocumentKind, InputSource};
use datumwerk_dates::analyze;
use datumwerk_document::{DocumentExtractor, OcrConfig, OcrEngine, fetch};
use sha2::{Digest, Sha256};

use output::ColorMode;

/// Find and validate calendar dates in PDFs and images, local or remote.
#[derive(Parser, Debug)]
#[command(name = "datumwerk", version, about, long_about = None)]
struct Cli {
    /// Path or HTTP(S) URL of the document to check
    source: String,

    /// Override the detected document kind (pdf, jpg, png, bmp, tiff)
    #[arg(long)]
    kind: Option<String>,

    /// Directory containing text-detection.rten / text-recognition.rten
    #[arg(long)]
    ocr_models: Option<PathBuf>,

    /// Disable the OCR fallback stage
    #[arg(long)]
    no_ocr: bool,

    /// POST the JSON outcome report to this endpoint
    #[arg(long)]
    notify: Option<String>,

    /// Write the full extracted text to this file
    #[arg(long)]
    save_text: Option<PathBuf>,

    /// Characters of extracted text to echo as a preview (0 = none)
    #[arg(long, default_value_t = 500)]
    preview_chars: usize,

    /// Print the outcome report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Flags > environment > defaults.
    let config = AppConfig {
        notify_url: cli
            .notify
            .clone()
            .or_else(|| std::env::var("DATUMWERK_NOTIFY_URL").ok()),
        ocr_model_dir: cli
            .ocr_models
            .clone()
            .or_else(|| std::env::var("DATUMWERK_OCR_MODELS").ok().map(PathBuf::from)),
        ocr_enabled: !cli.no_ocr,
        preview_chars: cli.preview_chars,
        save_text_path: cli.save_text.clone(),
    };

    run(cli, config).await
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let color = ColorMode(!cli.no_color && !cli.json);
    let mut out = std::io::stdout().lock();

    let source = InputSource::parse(&cli.source);
    let kind = resolve_kind(&cli)?;

    let data = match &source {
        InputSource::Local(path) => std::fs::read(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        InputSource::Remote(url) => fetch::fetch_bytes(url).await?,
    };
    let document_sha256 = hex::encode(Sha256::digest(&data));

    let extractor = build_extractor(&config);
    let extracted = extractor.extract(&data, kind)?;

    if extracted.is_blank() {
        anyhow::bail!("no text could be extracted from {source}");
    }

    if let Some(path) = &config.save_text_path {
        std::fs::write(path, &extracted.content)
            .with_context(|| format!("cannot write extracted text to {}", path.display()))?;
    }

    let report = analyze(&extracted.content);

    if cli.json {
        let payload =
            notify::OutcomePayload::new(&source, kind, &document_sha256, &extracted, &report);
        serde_json::to_writer_pretty(&mut out, &payload)?;
        writeln!(out)?;
    } else {
        output::print_extraction_summary(
            &mut out,
            &source,
            &extracted,
            config.preview_chars,
            color,
        )?;
        output::print_report(&mut out, &report, color)?;
    }

    if let Some(url) = &config.notify_url {
        let payload =
            notify::OutcomePayload::new(&source, kind, &document_sha256, &extracted, &report);
        if let Err(err) = notify::post_outcome(url, &payload).await {
            tracing::warn!(%err, "Outcome notification failed");
        }
    }

    Ok(())
}

/// Document kind from the `--kind` override, else from the source's
/// extension. Unknown kinds are a user-facing error, not a guess.
fn resolve_kind(cli: &Cli) -> Result<DocumentKind, DatumwerkError> {
    if let Some(kind) = &cli.kind {
        DocumentKind::from_extension(kind)
            .ok_or_else(|| DatumwerkError::UnsupportedDocument(kind.clone()))
    } else {
        DocumentKind::from_path_or_url(&cli.source).ok_or_else(|| {
            DatumwerkError::UnsupportedDocument(format!(
                "cannot tell the document type of {} — pass --kind",
                cli.source
            ))
        })
    }
}

/// Build the extractor, degrading to text-layer-only when the OCR models are
/// unavailable. Missing models must not block PDFs that have a text layer;
/// documents that then turn out to need OCR fail with a clear message.
fn build_extractor(config: &AppConfig) -> DocumentExtractor {
    if !config.ocr_enabled {
        return DocumentExtractor::text_layer_only();
    }

    let ocr_config = match &config.ocr_model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };

    match OcrEngine::new(ocr_config) {
        Ok(engine) => DocumentExtractor::with_ocr(engine),
        Err(err) => {
            tracing::warn!(%err, "OCR engine unavailable — continuing with text layer only");
            DocumentExtractor::text_layer_only()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(source: &str, kind: Option<&str>) -> Cli {
        Cli {
            source: source.to_string(),
            kind: kind.map(str::to_string),
            ocr_models: None,
            no_ocr: true,
            notify: None,
            save_text: None,
            preview_chars: 0,
            json: false,
            no_color: true,
        }
    }

    #[test]
    fn kind_detected_from_extension() {
        let cli = cli_for("https://host/scan.pdf?dl=1", None);
        assert_eq!(resolve_kind(&cli).unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn kind_override_wins() {
        let cli = cli_for("/tmp/blob.bin", Some("png"));
        assert_eq!(resolve_kind(&cli).unwrap(), DocumentKind::Png);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let cli = cli_for("/tmp/notes.docx", None);
        assert!(matches!(
            resolve_kind(&cli),
            Err(DatumwerkError::UnsupportedDocument(_))
        ));
    }
}
