// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console rendering of extraction summaries and the three-state outcome.
// Everything writes through a `dyn Write` so tests can capture the output.

use std::io::Write;

use datumwerk_core::types::{ExtractedText, ExtractionMethod, InputSource};
use datumwerk_dates::{DateReport, Verdict};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn method_label(method: ExtractionMethod) -> &'static str {
    match method {
        ExtractionMethod::TextLayer => "text layer",
        ExtractionMethod::EmbeddedImageOcr => "OCR on embedded page images",
        ExtractionMethod::ImageOcr => "OCR on image",
    }
}

/// Print what was extracted and from where, plus a short content preview.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    source: &InputSource,
    extracted: &ExtractedText,
    preview_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Processing {source}")?;
    writeln!(
        w,
        "Extracted {} characters / {} words from {} segment(s) via {}",
        extracted.char_count(),
        extracted.word_count(),
        extracted.segment_count,
        method_label(extracted.method),
    )?;

    if preview_chars > 0 {
        let preview: String = extracted.content.chars().take(preview_chars).collect();
        writeln!(w)?;
        writeln!(w, "Extracted text (preview):")?;
        if color.enabled() {
            writeln!(w, "{}", preview.dimmed())?;
        } else {
            writeln!(w, "{preview}")?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the date discovery outcome, branching on the three verdict states.
pub fn print_report(
    w: &mut dyn Write,
    report: &DateReport,
    color: ColorMode,
) -> std::io::Result<()> {
    match report.verdict() {
        Verdict::NoCandidates => {
            writeln!(w, "No date-like candidates found in the document.")?;
        }
        Verdict::NoValidDates => {
            let line = format!(
                "Found {} date-shaped candidate(s), but none is a valid calendar date.",
                report.candidates.len()
            );
            if color.enabled() {
                writeln!(w, "{}", line.yellow())?;
            } else {
                writeln!(w, "{line}")?;
            }
        }
        Verdict::ValidDatesFound => {
            if color.enabled() {
                writeln!(w, "{}", "Detected valid dates:".green())?;
            } else {
                writeln!(w, "Detected valid dates:")?;
            }
            for validated in &report.valid {
                // NaiveDate displays as ISO `YYYY-MM-DD`.
                writeln!(w, "  {}  (matched \"{}\")", validated.date, validated.text)?;
            }
            let rejected = report.candidates.len() - report.valid.len();
            if rejected > 0 {
                let line = format!("({rejected} candidate(s) failed calendar validation)");
                if color.enabled() {
                    writeln!(w, "{}", line.dimmed())?;
                } else {
                    writeln!(w, "{line}")?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datumwerk_dates::analyze;

    fn render_report(text: &str) -> String {
        let report = analyze(text);
        let mut buffer = Vec::new();
        print_report(&mut buffer, &report, ColorMode(false)).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn no_candidates_message() {
        let rendered = render_report("nothing numeric here");
        assert!(rendered.contains("No date-like candidates"));
    }

    #[test]
    fn all_invalid_message_counts_candidates() {
        let rendered = render_report("13/13/2023 and 31/02/2023");
        assert!(rendered.contains("2 date-shaped candidate(s)"));
        assert!(rendered.contains("none is a valid calendar date"));
    }

    #[test]
    fn valid_dates_are_listed_normalized() {
        let rendered = render_report("due 15/03/2024, noise 31/02/2023");
        assert!(rendered.contains("Detected valid dates:"));
        assert!(rendered.contains("2024-03-15"));
        assert!(rendered.contains("matched \"15/03/2024\""));
        assert!(rendered.contains("1 candidate(s) failed"));
    }

    #[test]
    fn extraction_summary_mentions_method_and_preview() {
        let extracted = ExtractedText::new(
            "the text body".into(),
            ExtractionMethod::TextLayer,
            3,
        );
        let source = InputSource::parse("/tmp/some.pdf");

        let mut buffer = Vec::new();
        print_extraction_summary(&mut buffer, &source, &extracted, 500, ColorMode(false)).unwrap();
        let rendered = String::from_utf8(buffer).unwrap();

        assert!(rendered.contains("/tmp/some.pdf"));
        assert!(rendered.contains("text layer"));
        assert!(rendered.contains("3 segment(s)"));
        assert!(rendered.contains("the text body"));
    }

    #[test]
    fn preview_respects_character_limit() {
        let extracted = ExtractedText::new(
            "abcdefghij".repeat(100),
            ExtractionMethod::ImageOcr,
            1,
        );
        let source = InputSource::parse("scan.png");

        let mut buffer = Vec::new();
        print_extraction_summary(&mut buffer, &source, &extracted, 10, ColorMode(false)).unwrap();
        let rendered = String::from_utf8(buffer).unwrap();

        assert!(rendered.contains("abcdefghij\n"));
        assert!(!rendered.contains("abcdefghijabcdefghij"));
    }
}
