// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// datumwerk-dates — date discovery core for Datumwerk.
//
// A two-stage filter over a text blob: `scanner` finds substrings that are
// structurally date-shaped, `validate` decides which of them denote real
// calendar dates, and `report` composes both into the outcome callers branch
// on. Everything in this crate is pure and synchronous — no I/O, no clocks,
// no shared state — so independent callers can run it in parallel freely.

pub mod report;
pub mod scanner;
pub mod validate;

pub use report::{DateReport, ValidatedDate, Verdict, analyze};
pub use scanner::{Candidate, PatternClass, scan};
pub use validate::{is_valid_date, parse_date};
