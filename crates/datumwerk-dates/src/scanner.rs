// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate scanner — finds date-shaped substrings in noisy document text.
//
// Scanning is purely structural: a candidate "looks like" a date (digit
// groups with recognised separators, or an unbroken 8-digit run) with no
// claim that it denotes a real calendar date. Calendar semantics live in
// `validate`. Keeping the scanner permissive means unusual-but-legitimate
// dates survive to validation instead of being dropped here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Structural shape that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternClass {
    /// Two 1-2 digit groups then a 2- or 4-digit group, separated by `/`,
    /// `-`, `.`, or space (`15/03/2024`, `1-2-99`, `07.04.23`).
    SeparatedTriplet,
    /// A 4-digit group leading two 1-2 digit groups (`2024-03-15`).
    YearLeadingTriplet,
    /// Exactly eight digits with no separator (`03152024`).
    DigitRun,
}

/// A date-shaped substring found in the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// The matched text, exactly as it appears in the input.
    pub text: String,
    /// Which pattern shape matched.
    pub class: PatternClass,
    /// Byte offset of the first character in the input.
    pub offset: usize,
}

/// Pattern table, kept as data so new formats slot in without touching the
/// validator. Each pattern is matched independently over the whole input;
/// table order only breaks ties when two classes match the identical span.
///
/// Every pattern requires word boundaries on both ends so that date-shaped
/// fragments inside longer identifiers (account numbers, barcodes) are not
/// captured.
const PATTERNS: &[(PatternClass, &str)] = &[
    (
        PatternClass::SeparatedTriplet,
        r"\b\d{1,2}[/\-. ]\d{1,2}[/\-. ](?:\d{4}|\d{2})\b",
    ),
    (
        PatternClass::YearLeadingTriplet,
        r"\b\d{4}[/\-. ]\d{1,2}[/\-. ]\d{1,2}\b",
    ),
    (PatternClass::DigitRun, r"\b\d{8}\b"),
];

static COMPILED: Lazy<Vec<(PatternClass, Regex)>> = Lazy::new(|| {
    PATTERNS
        .iter()
        .map(|(class, pattern)| {
            let regex = Regex::new(pattern).expect("date pattern must compile");
            (*class, regex)
        })
        .collect()
});

/// Scan `text` for date-shaped substrings.
///
/// Candidates come back in left-to-right order of first appearance,
/// regardless of which pattern matched them. Repeated occurrences are
/// preserved — each may matter to the caller. Never fails: text without
/// matches (including empty text) yields an empty vector.
pub fn scan(text: &str) -> Vec<Candidate> {
    let mut found: Vec<Candidate> = Vec::new();

    for (class, regex) in COMPILED.iter() {
        for m in regex.find_iter(text) {
            found.push(Candidate {
                text: m.as_str().to_string(),
                class: *class,
                offset: m.start(),
            });
        }
    }

    // Left-to-right total order. The sort is stable, so an identical span
    // matched by more than one pattern keeps the first class in table order
    // after dedup; overlapping-but-distinct spans are both kept.
    found.sort_by_key(|candidate| candidate.offset);
    found.dedup_by(|later, earlier| {
        later.offset == earlier.offset && later.text == earlier.text
    });
    found
}
