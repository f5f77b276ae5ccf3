// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outcome reporting — composes the scanner and validator into the single
// entry point callers use, and carries the three-state verdict downstream
// consumers branch on.

use chrono::NaiveDate;
use serde::Serialize;

use crate::scanner::{self, Candidate};
use crate::validate;

/// A candidate that survived calendar validation, with its normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedDate {
    /// The candidate text exactly as matched in the input.
    pub text: String,
    /// The normalized calendar value.
    pub date: NaiveDate,
}

/// Everything the pipeline found in one text blob.
///
/// `valid` is always a subset of `candidates` (by value, in the same order).
/// The report is a pure function of the input text: same text, same report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateReport {
    /// All date-shaped substrings, in order of appearance.
    pub candidates: Vec<Candidate>,
    /// The candidates that denote real calendar dates.
    pub valid: Vec<ValidatedDate>,
}

/// The three reporting states downstream consumers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing in the text was even date-shaped.
    NoCandidates,
    /// Date-shaped substrings were found, but none is a real calendar date.
    NoValidDates,
    /// At least one real calendar date was found.
    ValidDatesFound,
}

impl DateReport {
    pub fn verdict(&self) -> Verdict {
        if self.candidates.is_empty() {
            Verdict::NoCandidates
        } else if self.valid.is_empty() {
            Verdict::NoValidDates
        } else {
            Verdict::ValidDatesFound
        }
    }
}

/// Run the full scan-and-validate pipeline over a text blob.
pub fn analyze(text: &str) -> DateReport {
    let candidates = scanner::scan(text);
    let valid = candidates
        .iter()
        .filter_map(|candidate| {
            validate::parse_date(&candidate.text).map(|date| ValidatedDate {
                text: candidate.text.clone(),
                date,
            })
        })
        .collect();

    DateReport { candidates, valid }
}
